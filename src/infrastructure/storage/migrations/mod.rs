//! Database migrations infrastructure

use sqlx::postgres::PgPool;
use tracing::info;

use crate::domain::DomainError;

/// PostgreSQL migrator recording applied versions in `_migrations`
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the migrations table if it doesn't exist
    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    async fn is_applied(&self, version: i64) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
            .bind(version)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check migration status: {}", e)))
    }

    /// Runs a single migration; returns false when it was already applied
    pub async fn run_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.ensure_migrations_table().await?;

        if self.is_applied(migration.version).await? {
            return Ok(false);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin migration: {}", e)))?;

        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(migration.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit migration: {}", e)))?;

        info!(
            version = migration.version,
            description = migration.description,
            "Applied migration"
        );

        Ok(true)
    }

    /// Reverts a single migration; returns false when it was not applied
    pub async fn revert_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.ensure_migrations_table().await?;

        if !self.is_applied(migration.version).await? {
            return Ok(false);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin revert: {}", e)))?;

        sqlx::raw_sql(migration.down)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to revert migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("DELETE FROM _migrations WHERE version = $1")
            .bind(migration.version)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to remove migration record {}: {}",
                    migration.version, e
                ))
            })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit revert: {}", e)))?;

        info!(version = migration.version, "Reverted migration");

        Ok(true)
    }

    /// Returns the latest applied migration version
    pub async fn current_version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        sqlx::query_scalar("SELECT MAX(version) FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get migration version: {}", e)))
    }
}

/// Represents a database migration
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Migration version, strictly increasing
    pub version: i64,
    /// Human-readable description
    pub description: &'static str,
    /// SQL to run when applying the migration
    pub up: &'static str,
    /// SQL to run when reverting the migration
    pub down: &'static str,
}

/// Migrations for the users table
pub fn user_migrations() -> Vec<Migration> {
    vec![
        Migration {
            version: 1,
            description: "Create users table",
            up: r#"
                CREATE TABLE IF NOT EXISTS users (
                    username TEXT PRIMARY KEY,
                    first_name TEXT,
                    last_name TEXT,
                    email TEXT NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );
                "#,
            down: r#"
                DROP TABLE IF EXISTS users;
                "#,
        },
        Migration {
            version: 2,
            description: "Bound users column lengths",
            up: r#"
                ALTER TABLE users
                    ALTER COLUMN username TYPE VARCHAR(80),
                    ALTER COLUMN first_name TYPE VARCHAR(80),
                    ALTER COLUMN last_name TYPE VARCHAR(80),
                    ALTER COLUMN email TYPE VARCHAR(254);
                "#,
            down: r#"
                ALTER TABLE users
                    ALTER COLUMN username TYPE TEXT,
                    ALTER COLUMN first_name TYPE TEXT,
                    ALTER COLUMN last_name TYPE TEXT,
                    ALTER COLUMN email TYPE TEXT;
                "#,
        },
    ]
}

/// Runs all pending user migrations, returning how many were applied
pub async fn run_user_migrations(pool: &PgPool) -> Result<usize, DomainError> {
    let migrator = PostgresMigrator::new(pool.clone());
    let mut applied = 0;

    for migration in user_migrations() {
        if migrator.run_migration(&migration).await? {
            applied += 1;
        }
    }

    Ok(applied)
}

/// Reverts the most recently applied user migration, returning its version
pub async fn revert_last_user_migration(pool: &PgPool) -> Result<Option<i64>, DomainError> {
    let migrator = PostgresMigrator::new(pool.clone());

    let Some(current) = migrator.current_version().await? else {
        return Ok(None);
    };

    let migration = user_migrations()
        .into_iter()
        .find(|m| m.version == current)
        .ok_or_else(|| {
            DomainError::configuration(format!("Unknown applied migration version {}", current))
        })?;

    migrator.revert_migration(&migration).await?;

    Ok(Some(current))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_migrations_order() {
        let migrations = user_migrations();

        assert!(!migrations.is_empty());

        for pair in migrations.windows(2) {
            assert!(
                pair[1].version > pair[0].version,
                "Migrations should be in ascending order"
            );
        }
    }

    #[test]
    fn test_user_migrations_content() {
        for migration in user_migrations() {
            assert!(!migration.description.is_empty());
            assert!(!migration.up.trim().is_empty());
            assert!(!migration.down.trim().is_empty());
        }
    }

    #[test]
    fn test_users_table_keys_on_username() {
        let first = user_migrations()[0];

        assert!(first.up.contains("CREATE TABLE IF NOT EXISTS users"));
        assert!(first.up.contains("username TEXT PRIMARY KEY"));
        assert!(first.up.contains("email TEXT NOT NULL"));
    }

    #[test]
    fn test_column_lengths_match_validation_limits() {
        use crate::domain::user::{MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MAX_USERNAME_LENGTH};

        let bounds = user_migrations()
            .into_iter()
            .find(|m| m.version == 2)
            .unwrap();

        for (column, limit) in [
            ("username", MAX_USERNAME_LENGTH),
            ("first_name", MAX_NAME_LENGTH),
            ("last_name", MAX_NAME_LENGTH),
            ("email", MAX_EMAIL_LENGTH),
        ] {
            let clause = format!("ALTER COLUMN {} TYPE VARCHAR({})", column, limit);
            assert!(bounds.up.contains(&clause), "missing {clause}");
        }
    }
}
