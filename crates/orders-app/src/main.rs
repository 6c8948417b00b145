use anyhow::Context;
use orders_hex::application::order_service::OrderService;
use orders_hex::config::Config;
use orders_hex::inbound::http::{HttpServer, HttpServerConfig};
use orders_repo::{build_repo, Repo};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for DATABASE_URL / SERVER_PORT / RUST_LOG when present.
    let _ = dotenvy::dotenv();
    let config = Config::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter.as_str())
        .init();

    let repo: Repo = build_repo(config.database_url.as_deref())
        .await
        .context("failed to open order store")?;
    let service = OrderService::new(repo);

    let server_cfg = HttpServerConfig {
        port: config.server_port.clone(),
    };

    tracing::info!(port = %config.server_port, "order service starting");
    let http = HttpServer::new(service, server_cfg).await?;
    http.run().await
}
