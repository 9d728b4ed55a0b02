//! Repository implementations for database access
//!
//! Each repository borrows the pool and exposes one method per query.

pub mod posts;
pub mod users;

pub use posts::{OwnPost, Post, PostRepo, PostSummary};
pub use users::{User, UserCredentials, UserRepo};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {message}")]
    Conflict { message: String },
}

impl DbError {
    /// Map a unique-constraint violation to `Conflict`, anything else to `Sqlx`.
    fn on_unique_violation(err: sqlx::Error, message: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::Conflict {
                message: message.to_owned(),
            },
            _ => Self::Sqlx(err),
        }
    }
}

#[cfg(test)]
pub(crate) async fn test_pool() -> sqlx::SqlitePool {
    let pool = crate::db::create_memory_pool()
        .await
        .expect("pool creation failed");
    crate::db::migrations::run(&pool)
        .await
        .expect("migrations failed");
    pool
}
