//! Database layer - connection pool, schema, and repositories
//!
//! - Parameterized queries only
//! - Rely on DB constraints, handle conflicts - no check-then-insert
//! - Ownership checks live in the `WHERE` clause of mutations

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{create_memory_pool, create_pool};
pub use repos::*;
