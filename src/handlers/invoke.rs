//! 本地调用端点
//!
//! 使用与 Lambda 运行时接口模拟器相同的路径，便于在本地用 HTTP 触发一次写入。

use axum::{
    Json,
    body::Bytes,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::error::WriterError;
use crate::writer::{BucketWriter, LaunchEvent};

/// 本地调用路径
pub const INVOKE_PATH: &str = "/2015-03-31/functions/function/invocations";

/// 健康检查路径
pub const HEALTH_PATH: &str = "/health";

/// 调用失败时返回的错误体
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeError {
    pub error_type: &'static str,
    pub error_message: String,
}

impl InvokeError {
    fn response(status: StatusCode, error_type: &'static str, message: String) -> Response {
        (
            status,
            Json(InvokeError {
                error_type,
                error_message: message,
            }),
        )
            .into_response()
    }
}

/// 错误类型名称
fn error_type(error: &WriterError) -> &'static str {
    match error {
        WriterError::MissingConfig(_) => "MissingConfiguration",
        WriterError::InvalidConfig { .. } => "InvalidConfiguration",
        WriterError::NoBuckets => "NoBuckets",
        WriterError::Storage(_) => "StorageError",
    }
}

/// 解析请求体。空请求体和 `null` 都视为没有事件。
fn parse_event(body: &Bytes) -> Result<Option<LaunchEvent>, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let value: Value = serde_json::from_slice(body)?;
    Ok(LaunchEvent::from_value(&value))
}

/// 处理本地调用请求。
///
/// # 参数
///
/// * `Extension(writer)` - 存储桶写入器。
/// * `body` - 原始请求体，可为空或任意 JSON。
///
/// # 返回值
///
/// 成功时返回写入结果 JSON；请求体无法解析时返回 400；调用失败时返回 500。
pub async fn handle_invoke(Extension(writer): Extension<BucketWriter>, body: Bytes) -> Response {
    let event = match parse_event(&body) {
        Ok(event) => event,
        Err(e) => {
            return InvokeError::response(StatusCode::BAD_REQUEST, "InvalidEvent", e.to_string());
        }
    };

    match writer.invoke(event.as_ref()).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => {
            warn!(error = %e, "local invocation failed");
            InvokeError::response(StatusCode::INTERNAL_SERVER_ERROR, error_type(&e), e.to_string())
        }
    }
}

/// 健康检查
pub async fn handle_health() -> &'static str {
    "ok"
}
