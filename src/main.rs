use std::process;
use std::sync::Arc;

use anyhow::Context as _;
use lambda_runtime::{LambdaEvent, service_fn};
use serde_json::Value;
use tracing::{error, info, info_span};
use tracing_subscriber::{EnvFilter, fmt, fmt::time::LocalTime};

use bucket_writer::BucketWriter;
use bucket_writer::config::{self, EnvSource, LOCAL_INVOKE_ADDR_VAR, ProcessEnv, S3Settings};
use bucket_writer::handlers::{function_handler, run_debug};
use bucket_writer::s3::{ObjectStore, S3Store, create_s3_client};
use bucket_writer::writer::SystemClock;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载 .env 文件
    dotenvy::dotenv().ok();

    fmt()
        .with_timer(LocalTime::rfc_3339())
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let env = ProcessEnv;
    let settings = S3Settings::from_source(&env);

    if config::debug_mode(&env) {
        let code = run_debug(
            Arc::new(env),
            Arc::new(SystemClock),
            info_span!("bucket_writer"),
            || async move {
                let store: Arc<dyn ObjectStore> =
                    Arc::new(S3Store::new(create_s3_client(&settings).await));
                store
            },
        )
        .await;
        process::exit(code);
    }

    let writer = BucketWriter::new(
        Arc::new(S3Store::new(create_s3_client(&settings).await)),
        Arc::new(SystemClock),
        Arc::new(env),
        info_span!("bucket_writer"),
    );

    if let Some(addr) = env.var(LOCAL_INVOKE_ADDR_VAR) {
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        info!("local invoke server listening on http://{}", addr);
        axum::serve(listener, bucket_writer::app(writer)).await?;
        return Ok(());
    }

    lambda_runtime::run(service_fn(|event: LambdaEvent<Value>| {
        let writer = writer.clone();
        async move {
            function_handler(&writer, event).await.map_err(|e| {
                // 缺少配置时结束进程，提示已由写入器记录
                if e.is_missing_config() {
                    process::exit(e.exit_code());
                }
                error!(error = %e, "invocation failed");
                lambda_runtime::Error::from(e)
            })
        }
    }))
    .await
    .map_err(|e| anyhow::anyhow!(e))
}
