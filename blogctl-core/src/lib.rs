//! blogctl-core: configuration and the Markdown content pipeline
//!
//! Shared by the HTTP server and the `blogctl` binary.

pub mod config;
pub mod markdown;

pub use config::{load_dotenv, BlogConfig, ConfigError};
pub use markdown::render_markdown_safe;
