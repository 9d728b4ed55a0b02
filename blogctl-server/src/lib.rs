//! blogctl-server: a small multi-user Markdown blog
//!
//! Users register, log in and publish posts written in Markdown. Posts are
//! rendered to sanitized HTML once, at write time, and served from SQLite.

pub mod auth;
pub mod db;
pub mod http;
pub mod models;
pub mod state;
pub mod views;

pub use http::{build_router, run_server, ServerConfig, ServerError};
pub use state::AppState;
