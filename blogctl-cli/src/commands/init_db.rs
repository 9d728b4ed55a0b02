//! Database initialization command

use std::path::PathBuf;

use anyhow::{Context, Result};
use blogctl_core::BlogConfig;
use clap::Parser;

use blogctl_server::db::{create_pool, migrations};

#[derive(Parser, Debug)]
pub struct InitDbArgs {
    /// SQLite database file (overrides config)
    #[arg(long)]
    pub database: Option<PathBuf>,
}

/// Create the database file and its tables. Existing data is kept.
pub async fn run_init_db(args: InitDbArgs, config: BlogConfig) -> Result<()> {
    let path = args.database.unwrap_or(config.database_path);

    let pool = create_pool(&path)
        .await
        .context(format!("Failed to open database at {}", path.display()))?;

    migrations::run(&pool)
        .await
        .context("Failed to create tables")?;

    pool.close().await;

    println!("Initialized the database at {}", path.display());
    Ok(())
}
