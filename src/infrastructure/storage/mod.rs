//! Storage infrastructure - backend selection, pooling and migrations

mod factory;
pub mod migrations;
mod postgres;

pub use factory::{StorageConfig, StorageType};
pub use migrations::{
    revert_last_user_migration, run_user_migrations, Migration, PostgresMigrator,
};
pub use postgres::{connect_pool, PostgresConfig};
