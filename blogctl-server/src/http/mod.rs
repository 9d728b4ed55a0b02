//! HTTP server layer
//!
//! Axum server with:
//! - Server-rendered HTML pages plus a small JSON API
//! - Signed-cookie sessions and flash messages
//! - Request tracing
//! - Graceful shutdown

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::{ApiError, PageError};
pub use server::{build_router, run_server, ServerConfig, ServerError};
