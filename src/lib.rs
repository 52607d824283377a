//! 存储桶写入函数库
//!
//! 一个以无服务器函数形式运行的小工具，每次调用：
//! - 检查 `S3_BUCKET_NAME` 是否已配置
//! - 列出当前凭证可见的存储桶并选择第一个
//! - 以当前时间命名写入一个文本对象

pub mod config;
pub mod error;
pub mod handlers;
pub mod s3;
pub mod writer;

use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

pub use error::WriterError;
pub use writer::{BucketWriter, WriteOutcome};

/// 创建本地调用使用的 Axum 应用程序
///
/// 此函数设置：
/// - 与 Lambda 运行时接口模拟器一致的调用路由
/// - 健康检查路由
/// - 请求追踪中间件
///
/// # 参数
///
/// * `writer` - 处理调用的存储桶写入器。
///
/// # Returns
///
/// 返回配置好的Axum Router实例
pub fn app(writer: BucketWriter) -> axum::Router {
    axum::Router::new()
        .route(handlers::invoke::INVOKE_PATH, post(handlers::handle_invoke))
        .route(handlers::invoke::HEALTH_PATH, get(handlers::handle_health))
        .layer(TraceLayer::new_for_http())
        .layer(axum::extract::Extension(writer))
}
