use anyhow::Context;

mod app;
mod auth;
mod config;
mod error;
mod state;
mod users;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "accounts=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env().context("load configuration")?;
    tracing::info!(
        registration = ?config.registration,
        static_dir = ?config.static_dir,
        "configuration loaded"
    );

    // a store that cannot be reached is fatal
    let app_state = AppState::init(config)
        .await
        .context("initialize credential store")?;

    let config = app_state.config.clone();
    let router = app::build_app(app_state.clone());
    let served = app::serve(router, &config).await;

    app_state.shutdown().await;
    tracing::info!("server stopped");
    served
}
