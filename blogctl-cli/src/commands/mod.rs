//! Subcommand implementations

pub mod config;
pub mod init_db;
pub mod serve;

pub use config::run_config;
pub use init_db::run_init_db;
pub use serve::run_serve;
