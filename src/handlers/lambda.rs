//! Lambda 运行时入口。

use lambda_runtime::LambdaEvent;
use serde_json::Value;
use tracing::info;

use crate::error::WriterError;
use crate::writer::{BucketWriter, LaunchEvent, WriteOutcome};

/// 处理一次 Lambda 调用。
///
/// 上下文只写入日志，不参与处理。`null` 负载视为没有事件。
///
/// # 参数
///
/// * `writer` - 存储桶写入器。
/// * `event` - Lambda 事件，包含负载和调用上下文。
///
/// # 返回值
///
/// 写入结果。
///
/// # Errors
///
/// 透传 [`BucketWriter::invoke`] 的错误。
pub async fn function_handler(
    writer: &BucketWriter,
    event: LambdaEvent<Value>,
) -> Result<WriteOutcome, WriterError> {
    let (payload, context) = event.into_parts();
    info!("{}", payload);
    info!("{:?}", context);
    info!("Hello, World!");

    let launch = LaunchEvent::from_value(&payload);
    writer.invoke(launch.as_ref()).await
}
