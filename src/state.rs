use std::sync::Arc;

use crate::auth::jwt::JwtKeys;
use crate::config::AppConfig;
use crate::users::repo::UserStore;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub keys: JwtKeys,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn from_parts(users: Arc<dyn UserStore>, config: Arc<AppConfig>) -> Self {
        Self {
            users,
            keys: JwtKeys::new(&config.jwt),
            config,
        }
    }

    /// State backed by an in-memory store; the store handle is returned too.
    #[cfg(test)]
    pub fn fake() -> (Self, Arc<crate::users::memory::MemoryUserStore>) {
        use crate::config::DatabaseConfig;
        use crate::users::memory::MemoryUserStore;

        let config = Arc::new(AppConfig {
            database: DatabaseConfig {
                name: "skyearth_test".into(),
                user: "postgres".into(),
                password: String::new(),
                host: "localhost".into(),
                port: 5432,
                maintenance_name: "postgres".into(),
                max_connections: 1,
            },
            jwt: crate::auth::jwt::test_config("test-secret"),
            host: "127.0.0.1".into(),
            port: 0,
            cors_origin: "http://localhost:3000".into(),
        });

        let store = Arc::new(MemoryUserStore::new());
        let state = Self::from_parts(store.clone(), config);
        (state, store)
    }
}
