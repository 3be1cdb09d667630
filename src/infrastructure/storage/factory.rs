//! Storage selection from configuration

use crate::config::StorageSettings;
use crate::domain::DomainError;

use super::postgres::PostgresConfig;

/// Supported storage types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Resolved storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// In-memory storage configuration
    InMemory,
    /// PostgreSQL storage configuration
    Postgres(PostgresConfig),
}

impl StorageConfig {
    /// Creates an in-memory storage configuration
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Creates a PostgreSQL configuration from a URL
    pub fn postgres_url(url: impl Into<String>) -> Self {
        Self::Postgres(PostgresConfig::new(url))
    }

    /// Resolve settings into a concrete configuration.
    ///
    /// For PostgreSQL the URL comes from the settings, falling back to the
    /// `DATABASE_URL` value passed in.
    pub fn from_settings(
        settings: &StorageSettings,
        database_url: Option<String>,
    ) -> Result<Self, DomainError> {
        let storage_type = StorageType::from_str(&settings.backend).ok_or_else(|| {
            DomainError::configuration(format!(
                "Unknown storage backend '{}'",
                settings.backend
            ))
        })?;

        match storage_type {
            StorageType::InMemory => Ok(Self::InMemory),
            StorageType::Postgres => {
                let url = settings.url.clone().or(database_url).ok_or_else(|| {
                    DomainError::configuration(
                        "PostgreSQL storage requires storage.url or DATABASE_URL",
                    )
                })?;

                Ok(Self::Postgres(
                    PostgresConfig::new(url)
                        .with_max_connections(settings.max_connections)
                        .with_min_connections(settings.min_connections)
                        .with_connect_timeout(settings.connect_timeout_secs)
                        .with_idle_timeout(settings.idle_timeout_secs),
                ))
            }
        }
    }

    /// Returns the storage type
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(backend: &str, url: Option<&str>) -> StorageSettings {
        StorageSettings {
            backend: backend.to_string(),
            url: url.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!(StorageType::from_str("memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("In-Memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("postgres"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("postgresql"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("pg"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("sqlite"), None);
    }

    #[test]
    fn test_storage_config_types() {
        assert_eq!(StorageConfig::in_memory().storage_type(), StorageType::InMemory);
        assert_eq!(
            StorageConfig::postgres_url("postgres://localhost/test").storage_type(),
            StorageType::Postgres
        );
    }

    #[test]
    fn test_from_settings_memory() {
        let config = StorageConfig::from_settings(&settings("memory", None), None).unwrap();
        assert_eq!(config.storage_type(), StorageType::InMemory);
    }

    #[test]
    fn test_from_settings_postgres_prefers_configured_url() {
        let config = StorageConfig::from_settings(
            &settings("postgres", Some("postgres://configured/db")),
            Some("postgres://env/db".to_string()),
        )
        .unwrap();

        match config {
            StorageConfig::Postgres(pg) => {
                assert_eq!(pg.url, "postgres://configured/db");
                assert_eq!(pg.max_connections, StorageSettings::default().max_connections);
            }
            other => panic!("Expected Postgres config, got {other:?}"),
        }
    }

    #[test]
    fn test_from_settings_postgres_falls_back_to_database_url() {
        let config = StorageConfig::from_settings(
            &settings("pg", None),
            Some("postgres://env/db".to_string()),
        )
        .unwrap();

        match config {
            StorageConfig::Postgres(pg) => assert_eq!(pg.url, "postgres://env/db"),
            other => panic!("Expected Postgres config, got {other:?}"),
        }
    }

    #[test]
    fn test_from_settings_postgres_without_url() {
        let err = StorageConfig::from_settings(&settings("postgres", None), None).unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
    }

    #[test]
    fn test_from_settings_unknown_backend() {
        let err = StorageConfig::from_settings(&settings("sqlite", None), None).unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
    }
}
