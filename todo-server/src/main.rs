use anyhow::{anyhow, Context, Result};
use clap::Parser;
use todo_server::ServerConfig;
use tracing_subscriber::EnvFilter;

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing().ok();
    let config = ServerConfig::parse();
    todo_server::serve(config).await.context("server error")
}
