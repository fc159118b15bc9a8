use std::str::FromStr;

use anyhow::Context;
use axum::http::HeaderValue;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub name: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    /// Database we connect to when creating `name`.
    pub maintenance_name: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database = DatabaseConfig {
            name: var_or("DB_NAME", "skyearth_db"),
            user: var_or("DB_USER", "postgres"),
            password: var_or("DB_PASSWORD", ""),
            host: var_or("DB_HOST", "localhost"),
            port: parse_or("DB_PORT", 5432)?,
            maintenance_name: var_or("DB_MAINTENANCE_NAME", "postgres"),
            max_connections: parse_or("DB_POOL_MAX", 5)?,
        };
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: var_or("JWT_ISSUER", "skyearth"),
            audience: var_or("JWT_AUDIENCE", "skyearth-users"),
            ttl_minutes: parse_or("JWT_TTL_MINUTES", 60 * 24)?,
        };
        check_ttl_minutes(jwt.ttl_minutes)?;
        let cors_origin = var_or("CORS_ORIGIN", "http://localhost:3000");
        HeaderValue::from_str(&cors_origin).context("CORS_ORIGIN is not a valid header value")?;
        Ok(Self {
            database,
            jwt,
            host: var_or("APP_HOST", "0.0.0.0"),
            port: parse_or("PORT", 5000)?,
            cors_origin,
        })
    }
}

/// Upper bound for token lifetime: five years.
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 365 * 5;

fn check_ttl_minutes(minutes: i64) -> anyhow::Result<i64> {
    if !(1..=MAX_TTL_MINUTES).contains(&minutes) {
        anyhow::bail!("JWT_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}, got {minutes}");
    }
    Ok(minutes)
}

fn var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_falls_back_when_unset() {
        let v: u16 = parse_or("SKYEARTH_TEST_UNSET_PORT", 5000).unwrap();
        assert_eq!(v, 5000);
    }

    #[test]
    fn ttl_outside_bounds_is_rejected() {
        assert!(check_ttl_minutes(0).is_err());
        assert!(check_ttl_minutes(-5).is_err());
        assert!(check_ttl_minutes(MAX_TTL_MINUTES + 1).is_err());
        let err = check_ttl_minutes(i64::MAX / 2).unwrap_err();
        assert!(err.to_string().contains("JWT_TTL_MINUTES"));
        assert_eq!(check_ttl_minutes(60 * 24).unwrap(), 60 * 24);
        assert_eq!(check_ttl_minutes(MAX_TTL_MINUTES).unwrap(), MAX_TTL_MINUTES);
    }

    #[test]
    fn parse_or_rejects_garbage() {
        std::env::set_var("SKYEARTH_TEST_BAD_PORT", "not-a-port");
        let err = parse_or::<u16>("SKYEARTH_TEST_BAD_PORT", 5000).unwrap_err();
        assert!(err.to_string().contains("SKYEARTH_TEST_BAD_PORT"));
    }
}
