//! 存储桶写入模块
//!
//! 每次调用执行同一条路径：检查配置、列出存储桶、选择第一个、按当前时间生成键并写入问候语。

pub mod clock;
pub mod event;
pub mod key;

pub use clock::{Clock, FixedClock, SystemClock};
pub use event::{CLOUDWATCH_LAUNCH, LaunchEvent};
pub use key::{GREETING_PREFIX, KEY_EXTENSION, KeyFormat, greeting_body, object_key};

use serde::Serialize;
use std::sync::Arc;
use tracing::{Instrument, Span, error, info};

use crate::config::{Config, EnvSource};
use crate::error::WriterError;
use crate::s3::ObjectStore;

/// 无法从键推断类型时使用的 MIME 类型
const FALLBACK_CONTENT_TYPE: &str = "text/plain";

/// 一次成功写入的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteOutcome {
    pub bucket: String,
    pub key: String,
    pub body: String,
}

/// 存储桶写入器。
///
/// 持有存储、时钟和环境来源，以及调用方构建的日志 span；每次调用都在该 span 内执行。
#[derive(Clone)]
pub struct BucketWriter {
    store: Arc<dyn ObjectStore>,
    clock: Arc<dyn Clock>,
    env: Arc<dyn EnvSource>,
    span: Span,
}

impl BucketWriter {
    /// 创建写入器。
    ///
    /// # 参数
    ///
    /// * `store` - 对象存储。
    /// * `clock` - 时间来源。
    /// * `env` - 环境变量来源，每次调用时读取。
    /// * `span` - 日志 span，所有日志都记录在其中。
    pub fn new(
        store: Arc<dyn ObjectStore>,
        clock: Arc<dyn Clock>,
        env: Arc<dyn EnvSource>,
        span: Span,
    ) -> Self {
        Self {
            store,
            clock,
            env,
            span,
        }
    }

    /// 执行一次写入。
    ///
    /// 配置的存储桶名称只做存在性检查，实际写入的目标是列表中的第一个存储桶。
    ///
    /// # 参数
    ///
    /// * `event` - 可选的事件负载，只用于日志。
    ///
    /// # 返回值
    ///
    /// 写入的存储桶、键和内容。
    ///
    /// # Errors
    ///
    /// 缺少 `S3_BUCKET_NAME` 时返回 `WriterError::MissingConfig`，此时不会调用存储；
    /// 列表为空时返回 `WriterError::NoBuckets`；存储调用失败时返回 `WriterError::Storage`。
    pub async fn invoke(&self, event: Option<&LaunchEvent>) -> Result<WriteOutcome, WriterError> {
        self.invoke_inner(event)
            .instrument(self.span.clone())
            .await
    }

    async fn invoke_inner(&self, event: Option<&LaunchEvent>) -> Result<WriteOutcome, WriterError> {
        let config = match Config::from_source(self.env.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                error!("{}", e);
                return Err(e);
            }
        };

        if let Some(event) = event.filter(|e| e.is_cloudwatch_launch()) {
            info!(
                name = event.name.as_deref().unwrap_or_default(),
                bucket_name = event.bucket_name.as_deref().unwrap_or_default(),
                "{}",
                CLOUDWATCH_LAUNCH
            );
        }

        let buckets = self.store.list_buckets().await?;

        // 配置的名称在这里被丢弃
        let mybucket = buckets
            .into_iter()
            .next()
            .ok_or(WriterError::NoBuckets)?
            .name;
        info!("mybucket: {}", mybucket);
        if mybucket != config.bucket_name {
            info!(configured = %config.bucket_name, "configured bucket differs from selected bucket");
        }

        let current_time = config.key_format.format(&self.clock.now());
        let key = object_key(&current_time);
        let body = greeting_body(&mybucket, &current_time);
        let content_type = mime_guess::from_path(&key)
            .first_raw()
            .unwrap_or(FALLBACK_CONTENT_TYPE);

        self.store
            .put_object(&mybucket, &key, body.clone(), content_type)
            .await?;

        info!(bucket = %mybucket, key = %key, "object written");
        Ok(WriteOutcome {
            bucket: mybucket,
            key,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::s3::{BucketSummary, MockObjectStore, StorageError};
    use chrono::{Local, TimeZone};
    use std::collections::HashMap;
    use std::io;
    use std::sync::Mutex;

    /// 收集日志输出的写入端
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (logs, guard)
    }

    fn fixed_clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(
            Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap(),
        ))
    }

    fn env_with(pairs: &[(&str, &str)]) -> Arc<dyn EnvSource> {
        Arc::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<String, String>>(),
        )
    }

    fn writer(store: MockObjectStore, env: Arc<dyn EnvSource>) -> BucketWriter {
        BucketWriter::new(Arc::new(store), fixed_clock(), env, Span::none())
    }

    fn listing(names: &[&str]) -> Vec<BucketSummary> {
        names.iter().map(|n| BucketSummary::new(*n)).collect()
    }

    #[tokio::test]
    async fn test_missing_config_makes_no_storage_calls() {
        let mut store = MockObjectStore::new();
        store.expect_list_buckets().never();
        store.expect_put_object().never();

        let err = writer(store, env_with(&[])).invoke(None).await.unwrap_err();
        assert!(err.is_missing_config());
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_first_bucket_is_selected_even_if_configured_name_differs() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_buckets()
            .times(1)
            .returning(|| Ok(listing(&["alpha", "beta", "configured"])));
        store
            .expect_put_object()
            .withf(|bucket, key, body, content_type| {
                bucket == "alpha"
                    && key == "2024-03-05-14-07-09.txt"
                    && body == "Hello from alpha - current time is 2024-03-05-14-07-09"
                    && content_type == "text/plain"
            })
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let outcome = writer(store, env_with(&[("S3_BUCKET_NAME", "configured")]))
            .invoke(None)
            .await
            .unwrap();

        assert_eq!(outcome.bucket, "alpha");
        assert_eq!(outcome.key, "2024-03-05-14-07-09.txt");
    }

    #[tokio::test]
    async fn test_clock_12h_format_key_and_body_share_timestamp() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_buckets()
            .times(1)
            .returning(|| Ok(listing(&["only"])));
        store
            .expect_put_object()
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let outcome = writer(
            store,
            env_with(&[("S3_BUCKET_NAME", "x"), ("KEY_TIME_FORMAT", "12h")]),
        )
        .invoke(None)
        .await
        .unwrap();

        assert_eq!(outcome.key, "2024-03-05-02:07:09-PM.txt");
        let timestamp = outcome.key.trim_end_matches(KEY_EXTENSION);
        assert!(outcome.body.starts_with(GREETING_PREFIX));
        assert!(outcome.body.contains("only"));
        assert!(outcome.body.ends_with(timestamp));
    }

    #[tokio::test]
    async fn test_launch_event_does_not_change_selection() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_buckets()
            .times(1)
            .returning(|| Ok(listing(&["first", "archive"])));
        store
            .expect_put_object()
            .withf(|bucket, _, _, _| bucket == "first")
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let event = LaunchEvent {
            message: Some(CLOUDWATCH_LAUNCH.to_string()),
            name: Some("nightly".to_string()),
            bucket_name: Some("archive".to_string()),
        };

        let outcome = writer(store, env_with(&[("S3_BUCKET_NAME", "archive")]))
            .invoke(Some(&event))
            .await
            .unwrap();
        assert_eq!(outcome.bucket, "first");
    }

    #[tokio::test]
    async fn test_launch_event_fields_are_logged() {
        let (logs, _guard) = capture_logs();

        let mut store = MockObjectStore::new();
        store
            .expect_list_buckets()
            .times(1)
            .returning(|| Ok(listing(&["first"])));
        store
            .expect_put_object()
            .withf(|bucket, _, _, _| bucket == "first")
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let event = LaunchEvent {
            message: Some(CLOUDWATCH_LAUNCH.to_string()),
            name: Some("nightly-launch".to_string()),
            bucket_name: Some("launch-target".to_string()),
        };

        writer(store, env_with(&[("S3_BUCKET_NAME", "first")]))
            .invoke(Some(&event))
            .await
            .unwrap();

        let output = logs.contents();
        assert!(output.contains(CLOUDWATCH_LAUNCH));
        assert!(output.contains("nightly-launch"));
        assert!(output.contains("launch-target"));
        assert!(output.contains("mybucket: first"));
    }

    #[tokio::test]
    async fn test_other_events_skip_launch_log() {
        let (logs, _guard) = capture_logs();

        let mut store = MockObjectStore::new();
        store
            .expect_list_buckets()
            .returning(|| Ok(listing(&["first"])));
        store.expect_put_object().returning(|_, _, _, _| Ok(()));

        let event = LaunchEvent {
            message: Some("Scheduled".to_string()),
            name: Some("nightly-launch".to_string()),
            bucket_name: None,
        };

        writer(store, env_with(&[("S3_BUCKET_NAME", "first")]))
            .invoke(Some(&event))
            .await
            .unwrap();

        let output = logs.contents();
        assert!(!output.contains(CLOUDWATCH_LAUNCH));
        assert!(!output.contains("nightly-launch"));
    }

    #[tokio::test]
    async fn test_empty_listing_is_unhandled_error() {
        let mut store = MockObjectStore::new();
        store.expect_list_buckets().returning(|| Ok(Vec::new()));
        store.expect_put_object().never();

        let err = writer(store, env_with(&[("S3_BUCKET_NAME", "x")]))
            .invoke(None)
            .await
            .unwrap_err();
        assert!(matches!(err, WriterError::NoBuckets));
        assert_eq!(err.exit_code(), crate::error::UNHANDLED_EXIT_CODE);
    }

    #[tokio::test]
    async fn test_storage_errors_propagate() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_buckets()
            .returning(|| Ok(listing(&["a"])));
        store.expect_put_object().returning(|bucket, key, _, _| {
            Err(StorageError::Put {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: "AccessDenied".to_string(),
            })
        });

        let err = writer(store, env_with(&[("S3_BUCKET_NAME", "x")]))
            .invoke(None)
            .await
            .unwrap_err();
        assert!(matches!(err, WriterError::Storage(StorageError::Put { .. })));
    }

    #[tokio::test]
    async fn test_same_second_invocations_share_key() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_buckets()
            .times(2)
            .returning(|| Ok(listing(&["a"])));
        store
            .expect_put_object()
            .times(2)
            .returning(|_, _, _, _| Ok(()));

        let writer = writer(store, env_with(&[("S3_BUCKET_NAME", "x")]));
        let first = writer.invoke(None).await.unwrap();
        let second = writer.invoke(None).await.unwrap();
        assert_eq!(first.key, second.key);
    }
}
