//! User Directory
//!
//! HTTP service for managing user records:
//! - Create, fetch, list and update users keyed by username
//! - Username and email validation on every write
//! - In-memory or PostgreSQL storage

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::storage::{connect_pool, run_user_migrations, StorageConfig};
use infrastructure::user::{InMemoryUserRepository, PostgresUserRepository};
use tracing::info;

/// Resolve the storage backend from configuration
pub fn resolve_storage(config: &AppConfig) -> anyhow::Result<StorageConfig> {
    let storage = StorageConfig::from_settings(&config.storage, std::env::var("DATABASE_URL").ok())?;

    Ok(storage)
}

/// Create the application state, applying pending migrations on PostgreSQL
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage = resolve_storage(config)?;

    info!(backend = ?storage.storage_type(), "Storage backend selected");

    let state = match storage {
        StorageConfig::InMemory => {
            AppState::with_repository(Arc::new(InMemoryUserRepository::new()))
        }
        StorageConfig::Postgres(pg_config) => {
            info!("Connecting to PostgreSQL...");
            let pool = connect_pool(&pg_config).await?;
            info!("PostgreSQL connection established");

            let applied = run_user_migrations(&pool).await?;
            info!(applied, "Migrations complete");

            AppState::with_repository(Arc::new(PostgresUserRepository::new(pool)))
        }
    };

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::StorageType;

    #[tokio::test]
    async fn test_create_in_memory_state() {
        let config = AppConfig::default();
        let state = create_app_state(&config).await.unwrap();

        assert_eq!(state.user_service.count().await.unwrap(), 0);
    }

    #[test]
    fn test_resolve_unknown_backend() {
        let mut config = AppConfig::default();
        config.storage.backend = "cassandra".to_string();

        assert!(resolve_storage(&config).is_err());
    }

    #[test]
    fn test_resolve_postgres_from_settings_url() {
        let mut config = AppConfig::default();
        config.storage.backend = "postgres".to_string();
        config.storage.url = Some("postgres://db/users".to_string());

        let storage = resolve_storage(&config).unwrap();
        assert_eq!(storage.storage_type(), StorageType::Postgres);
    }
}
