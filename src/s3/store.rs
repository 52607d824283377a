//! 对象存储操作模块
//!
//! 该模块定义写入流程需要的两个存储操作，以及基于 `aws_sdk_s3::Client` 的实现。

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use std::sync::Arc;
use tracing::debug;

use super::error::{StorageError, StorageResult};

/// 存储桶列表中的一条记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSummary {
    pub name: String,
}

impl BucketSummary {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// 写入流程使用的对象存储接口。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// 列出当前凭证可见的全部存储桶，保持服务端返回的顺序。
    async fn list_buckets(&self) -> StorageResult<Vec<BucketSummary>>;

    /// 写入一个对象，已存在的同名对象会被覆盖。
    ///
    /// # 参数
    ///
    /// * `bucket` - 目标存储桶。
    /// * `key` - 对象键。
    /// * `body` - 对象内容。
    /// * `content_type` - 对象的 MIME 类型。
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: String,
        content_type: &str,
    ) -> StorageResult<()>;
}

/// 基于 AWS S3 的对象存储。
#[derive(Clone)]
pub struct S3Store {
    client: Arc<Client>,
}

impl S3Store {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_buckets(&self) -> StorageResult<Vec<BucketSummary>> {
        let mut buckets = Vec::new();
        let mut continuation_token: Option<String> = None;

        // 按 continuation token 翻页直到取完
        loop {
            let output = self
                .client
                .list_buckets()
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(StorageError::from)?;

            buckets.extend(
                output
                    .buckets()
                    .iter()
                    .filter_map(|bucket| bucket.name())
                    .map(BucketSummary::new),
            );

            match output.continuation_token() {
                Some(token) if !token.is_empty() => continuation_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!(count = buckets.len(), "listed buckets");
        Ok(buckets)
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: String,
        content_type: &str,
    ) -> StorageResult<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body.into_bytes()))
            .send()
            .await
            .map_err(|e| StorageError::put(bucket, key, e))?;

        debug!(bucket, key, "object written");
        Ok(())
    }
}
