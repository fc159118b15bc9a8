use std::sync::Arc;

mod app;
mod auth;
mod config;
mod db;
mod error;
mod state;
mod users;

use crate::{config::AppConfig, state::AppState, users::repo::PgUserStore};

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "skyearth=debug,axum=info,tower_http=info".to_string());
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
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Arc::new(AppConfig::from_env()?);

    // Both steps must succeed before the listener binds.
    db::ensure_database(&config.database).await?;
    let pool = db::connect_pool(&config.database).await?;
    db::ensure_schema(&pool).await?;

    let state = AppState::from_parts(Arc::new(PgUserStore::new(pool.clone())), config.clone());
    let served = app::serve(app::build_app(state), &config).await;

    pool.close().await;
    tracing::info!("database pool closed");
    served
}
