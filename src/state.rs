use std::sync::Arc;

use tracing::info;

use crate::{
    config::AppConfig,
    users::{
        memory::MemoryUserStore, postgres::PgUserStore, service::AccountService, store::UserStore,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub accounts: AccountService,
}

impl AppState {
    /// Connects the credential store named by `DATABASE_URL` and runs migrations.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn UserStore> = if config.database.url.starts_with("memory://") {
            info!("using in-memory user store");
            Arc::new(MemoryUserStore::new())
        } else {
            let pg = PgUserStore::connect(&config.database).await?;
            pg.migrate().await?;
            Arc::new(pg)
        };

        Ok(Self::from_parts(Arc::new(config), store))
    }

    pub fn from_parts(config: Arc<AppConfig>, store: Arc<dyn UserStore>) -> Self {
        Self {
            config,
            accounts: AccountService::new(store),
        }
    }

    pub async fn shutdown(&self) {
        self.accounts.store().close().await;
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::for_tests_with_policy(crate::config::RegistrationPolicy::Open)
    }

    #[cfg(test)]
    pub fn for_tests_with_policy(registration: crate::config::RegistrationPolicy) -> Self {
        use crate::config::{DatabaseConfig, JwtConfig};

        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            database: DatabaseConfig {
                url: "memory://".into(),
                max_connections: 1,
                acquire_timeout_secs: 1,
            },
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
                refresh_ttl_minutes: 60,
            },
            cors_origins: Vec::new(),
            static_dir: None,
            registration,
        });
        Self::from_parts(config, Arc::new(MemoryUserStore::new()))
    }
}
