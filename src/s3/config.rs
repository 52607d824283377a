//! S3配置模块
//!
//! 该模块负责S3客户端的配置和初始化。

use aws_config::BehaviorVersion;
use aws_config::Region;
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_s3::Client;
use std::sync::Arc;
use tracing::info;

use crate::config::S3Settings;

/// 创建 S3 客户端。
///
/// 凭证始终来自 AWS 默认凭证链。区域优先使用 `S3_REGION`，其次是标准的
/// `AWS_REGION` 等来源。
///
/// # 参数
///
/// * `settings` - 端点和区域的可选覆盖。设置了端点时会启用路径风格寻址，
///   以兼容 LocalStack、MinIO 等服务。
///
/// # 返回值
///
/// 配置好的 `aws_sdk_s3::Client`。
pub async fn create_s3_client(settings: &S3Settings) -> Arc<Client> {
    let region_provider =
        RegionProviderChain::first_try(settings.region.clone().map(Region::new)).or_default_provider();

    let aws_config = aws_config::defaults(BehaviorVersion::latest())
        .region(region_provider)
        .load()
        .await;

    let mut builder = aws_sdk_s3::config::Builder::from(&aws_config);
    if let Some(endpoint) = &settings.endpoint {
        info!(endpoint = %endpoint, "using custom S3 endpoint");
        builder = builder.endpoint_url(endpoint).force_path_style(true);
    }

    Arc::new(Client::from_conf(builder.build()))
}
