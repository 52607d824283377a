//! 调用入口模块
//!
//! 此模块包含触发一次写入的所有入口：
//! - Lambda 运行时处理器
//! - 本地 HTTP 调用处理器
//! - 调试模式下的单次本地运行

pub mod invoke;
pub mod lambda;

// 重新导出主要的公共接口
pub use invoke::{handle_health, handle_invoke};
pub use lambda::function_handler;

use std::future::Future;
use std::sync::Arc;
use tracing::{Span, error, info};

use crate::config::{Config, EnvSource};
use crate::error::WriterError;
use crate::s3::ObjectStore;
use crate::writer::{BucketWriter, Clock, WriteOutcome};

/// 调试模式下的本地运行：不带事件和上下文执行一次写入。
///
/// # 参数
///
/// * `writer` - 存储桶写入器。
///
/// # 返回值
///
/// 写入结果。
///
/// # Errors
///
/// 透传 [`BucketWriter::invoke`] 的错误。
pub async fn run_local(writer: &BucketWriter) -> Result<WriteOutcome, WriterError> {
    info!("DEBUG_MODE is set, running once locally");
    writer.invoke(None).await
}

/// 一次运行结果对应的进程退出码，成功为 0。
pub fn exit_code(result: &Result<WriteOutcome, WriterError>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(e) => e.exit_code(),
    }
}

/// 调试模式的完整流程，返回进程退出码。
///
/// 先检查配置，缺少 `S3_BUCKET_NAME` 时直接返回 1，不会创建存储客户端。
///
/// # 参数
///
/// * `env` - 环境变量来源。
/// * `clock` - 时间来源。
/// * `span` - 日志 span。
/// * `make_store` - 创建对象存储，只在配置检查通过后调用。
///
/// # 返回值
///
/// 进程退出码：成功为 0，缺少配置为 1，其余错误为 2。
pub async fn run_debug<F, Fut>(
    env: Arc<dyn EnvSource>,
    clock: Arc<dyn Clock>,
    span: Span,
    make_store: F,
) -> i32
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Arc<dyn ObjectStore>>,
{
    if let Err(e) = Config::from_source(env.as_ref()) {
        error!("{}", e);
        return e.exit_code();
    }

    let writer = BucketWriter::new(make_store().await, clock, env, span);
    let result = run_local(&writer).await;
    match &result {
        Ok(outcome) => info!(bucket = %outcome.bucket, key = %outcome.key, "local run finished"),
        Err(e) => error!(error = %e, "local run failed"),
    }
    exit_code(&result)
}
