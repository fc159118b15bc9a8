use std::time::Duration;

use anyhow::Context;
use sqlx::{
    migrate::Migrator,
    postgres::{PgConnectOptions, PgPoolOptions},
    Connection, PgConnection, PgPool,
};
use tracing::info;

use crate::config::DatabaseConfig;

/// Schema migrations; every script is idempotent and non-destructive.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

fn connect_options(cfg: &DatabaseConfig, database: &str) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&cfg.host)
        .port(cfg.port)
        .username(&cfg.user)
        .password(&cfg.password)
        .database(database)
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Create the application database if it does not exist yet.
pub async fn ensure_database(cfg: &DatabaseConfig) -> anyhow::Result<()> {
    let mut conn = PgConnection::connect_with(&connect_options(cfg, &cfg.maintenance_name))
        .await
        .with_context(|| format!("connect to maintenance database {}", cfg.maintenance_name))?;

    let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM pg_database WHERE datname = $1")
        .bind(&cfg.name)
        .fetch_optional(&mut conn)
        .await
        .context("look up database")?;

    if exists.is_none() {
        let created = sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&cfg.name)))
            .execute(&mut conn)
            .await;
        match created {
            Ok(_) => info!(database = %cfg.name, "database created"),
            // 42P04 duplicate_database: another instance won the race
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some("42P04") => {}
            Err(e) => return Err(e).context("create database"),
        }
    }

    conn.close().await.ok();
    info!(database = %cfg.name, "database is ready");
    Ok(())
}

pub async fn connect_pool(cfg: &DatabaseConfig) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(10))
        .connect_with(connect_options(cfg, &cfg.name))
        .await
        .context("connect to database")
}

/// Create tables that are missing. Existing tables are left untouched.
pub async fn ensure_schema(db: &PgPool) -> anyhow::Result<()> {
    MIGRATOR.run(db).await.context("run migrations")?;
    info!("database schema synchronized");
    Ok(())
}
