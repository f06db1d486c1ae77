use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use reviews_admin_api::auth::provider::{AuthProvider, HttpAuthProvider};
use reviews_admin_api::config;
use reviews_admin_api::routes::app;

#[derive(Debug, Parser)]
#[command(name = "reviews-admin-api", about = "Admin API for the reviews platform")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Port to listen on (falls back to PORT env, then 3000)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SESSION_SECRET, etc.
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Reviews Admin API in {:?} mode", config.environment);

    let provider: Arc<dyn AuthProvider> = Arc::new(
        HttpAuthProvider::from_config(&config.auth_provider)
            .context("auth provider configuration")?,
    );

    let port = args
        .port
        .or_else(|| std::env::var("PORT").ok().and_then(|s| s.parse().ok()))
        .unwrap_or(3000);

    let bind_addr = format!("{}:{}", args.bind, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Reviews Admin API listening on http://{}", bind_addr);

    axum::serve(listener, app(provider)).await.context("server")?;
    Ok(())
}
