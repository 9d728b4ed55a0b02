//! User repository
//!
//! Uniqueness of username and email is enforced by the schema; a violation
//! surfaces as `DbError::Conflict`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use super::DbError;
use crate::models::{Email, Username};

/// Public user record (no password hash)
#[derive(Debug, Clone, FromRow, Serialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// What login needs to check a password
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new user.
    ///
    /// Returns `DbError::Conflict` when the username or email is taken.
    pub async fn create(
        &self,
        username: &Username,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, DbError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, username, email, created_at
            "#,
        )
        .bind(username.as_str())
        .bind(email.as_str())
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| DbError::on_unique_violation(e, "username or email already registered"))
    }

    /// Look up login credentials by exact username.
    pub async fn find_credentials(&self, username: &str) -> Result<Option<UserCredentials>, DbError> {
        let creds = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, username, password_hash FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(creds)
    }

    /// Get a user by id, if it still exists.
    pub async fn find(&self, id: i64) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user by id.
    pub async fn get(&self, id: i64) -> Result<User, DbError> {
        self.find(id).await?.ok_or_else(|| DbError::NotFound {
            resource: "user",
            id: id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::test_pool;

    fn username(s: &str) -> Username {
        Username::new(s).unwrap()
    }

    fn email(s: &str) -> Email {
        Email::new(s).unwrap()
    }

    #[tokio::test]
    async fn create_and_fetch() {
        let pool = test_pool().await;
        let repo = UserRepo::new(&pool);

        let user = repo
            .create(&username("alice"), &email("alice@example.com"), "hash")
            .await
            .unwrap();
        assert_eq!(user.username, "alice");

        let fetched = repo.get(user.id).await.unwrap();
        assert_eq!(fetched, user);

        let creds = repo.find_credentials("alice").await.unwrap().unwrap();
        assert_eq!(creds.id, user.id);
        assert_eq!(creds.password_hash, "hash");
    }

    #[tokio::test]
    async fn duplicate_username_or_email_conflicts() {
        let pool = test_pool().await;
        let repo = UserRepo::new(&pool);

        repo.create(&username("alice"), &email("alice@example.com"), "h")
            .await
            .unwrap();

        let err = repo
            .create(&username("alice"), &email("other@example.com"), "h")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict { .. }));

        let err = repo
            .create(&username("bob"), &email("ALICE@example.com"), "h")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict { .. }));
    }

    #[tokio::test]
    async fn missing_user() {
        let pool = test_pool().await;
        let repo = UserRepo::new(&pool);

        assert!(repo.find(42).await.unwrap().is_none());
        assert!(repo.find_credentials("ghost").await.unwrap().is_none());
        assert!(matches!(
            repo.get(42).await.unwrap_err(),
            DbError::NotFound { resource: "user", .. }
        ));
    }
}
