//! HTTP server command
//!
//! Prepares the database and runs the blog server until Ctrl+C / SIGTERM.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use blogctl_core::BlogConfig;
use clap::Parser;

use blogctl_server::db::{create_pool, migrations};
use blogctl_server::http::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides config, default: 127.0.0.1:5000)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// SQLite database file (overrides config)
    #[arg(long)]
    pub database: Option<PathBuf>,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, mut config: BlogConfig) -> Result<()> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(database) = args.database {
        config.database_path = database;
    }

    if config.uses_default_secret() {
        tracing::warn!(
            "Using the built-in secret key; set SECRET_KEY or secret_key in the config before exposing this server"
        );
    }

    tracing::info!(
        database = %config.database_path.display(),
        "Starting blog server on {}",
        config.bind_addr
    );

    let pool = create_pool(&config.database_path)
        .await
        .context("Failed to open database")?;

    migrations::run(&pool)
        .await
        .context("Failed to prepare database schema")?;

    // Run server (blocks until shutdown)
    run_server(pool, ServerConfig::from_blog_config(&config))
        .await
        .context("Server error")?;

    Ok(())
}
