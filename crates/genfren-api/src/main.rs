//! GenFren API server binary.
//!
//! Configuration comes from the environment:
//!
//! - `GENFREN_HTTP_HOST`, `GENFREN_HTTP_PORT`, `GENFREN_MAX_BODY_BYTES`
//! - `GENLAYER_RPC_URL`, `GENLAYER_CONTRACT_ADDRESS`, `GENLAYER_CALLER_KEY`
//! - `GENFREN_LOG_LEVEL` (or `RUST_LOG`), `GENFREN_JSON_LOGS`

use anyhow::{Context, Result};
use genfren_api::{init_logging, ApiConfig, ApiService, LogConfig, VERSION};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(&LogConfig::from_env()).context("failed to initialise logging")?;

    let config = ApiConfig::from_env().context("invalid configuration")?;
    info!(
        version = VERSION,
        addr = %config.http_addr(),
        "GenFren API configured"
    );

    let service = ApiService::new(config).context("failed to build service")?;
    service
        .serve(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .context("server error")?;

    Ok(())
}
