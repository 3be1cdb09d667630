//! Migrate command - manages the PostgreSQL schema

use clap::Args;
use tracing::{info, warn};

use crate::infrastructure::storage::{
    connect_pool, revert_last_user_migration, run_user_migrations, StorageConfig,
};

#[derive(Args, Debug, Clone, Default)]
pub struct MigrateArgs {
    /// Revert the most recently applied migration instead
    #[arg(long)]
    pub revert: bool,
}

pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let pg_config = match crate::resolve_storage(&config)? {
        StorageConfig::Postgres(pg_config) => pg_config,
        StorageConfig::InMemory => {
            warn!("In-memory storage selected, nothing to migrate");
            return Ok(());
        }
    };

    let pool = connect_pool(&pg_config).await?;

    if args.revert {
        match revert_last_user_migration(&pool).await? {
            Some(version) => info!(version, "Migration reverted"),
            None => info!("No applied migrations to revert"),
        }
    } else {
        let applied = run_user_migrations(&pool).await?;
        info!(applied, "Migrations complete");
    }

    pool.close().await;

    Ok(())
}
