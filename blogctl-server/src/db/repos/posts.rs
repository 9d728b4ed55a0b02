//! Post repository
//!
//! Handles post CRUD with:
//! - Author name joined in (no N+1)
//! - Newest-first pagination
//! - Owner id in the `WHERE` clause of update/delete

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use super::DbError;
use crate::models::{Paginated, Pagination, PostBody, PostTitle};

/// Full post record with author name
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content_md: String,
    pub content_html: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub user_id: i64,
    pub author: String,
}

/// Post as shown on the front page
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostSummary {
    pub id: i64,
    pub title: String,
    pub content_html: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub user_id: i64,
    pub author: String,
}

/// Post as listed on the owner's profile
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OwnPost {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Post repository
pub struct PostRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PostRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a post and return its id.
    ///
    /// `html` must already be the sanitized rendering of `body`.
    pub async fn create(
        &self,
        user_id: i64,
        title: &PostTitle,
        body: &PostBody,
        html: &str,
    ) -> Result<i64, DbError> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO posts (title, content_md, content_html, created_at, user_id)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(title.as_str())
        .bind(body.as_str())
        .bind(html)
        .bind(Utc::now())
        .bind(user_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => DbError::NotFound {
                resource: "user",
                id: user_id.to_string(),
            },
            _ => DbError::Sqlx(e),
        })?;

        Ok(id)
    }

    /// Get a single post with its author.
    pub async fn get(&self, id: i64) -> Result<Post, DbError> {
        self.find(id).await?.ok_or_else(|| DbError::NotFound {
            resource: "post",
            id: id.to_string(),
        })
    }

    /// Get a single post with its author, if it exists.
    pub async fn find(&self, id: i64) -> Result<Option<Post>, DbError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT p.id, p.title, p.content_md, p.content_html, p.created_at,
                   p.updated_at, p.user_id, u.username AS author
            FROM posts p
            JOIN users u ON u.id = p.user_id
            WHERE p.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(post)
    }

    /// One page of posts, newest first.
    ///
    /// The total comes from its own `COUNT(*)` so pages past the end still
    /// report the right page count.
    pub async fn list_page(&self, page: Pagination) -> Result<Paginated<PostSummary>, DbError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
            .fetch_one(self.pool)
            .await?;

        let items = sqlx::query_as::<_, PostSummary>(
            r#"
            SELECT p.id, p.title, p.content_html, p.created_at, p.updated_at,
                   p.user_id, u.username AS author
            FROM posts p
            JOIN users u ON u.id = p.user_id
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(Paginated {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    /// All posts of one user, newest first.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<OwnPost>, DbError> {
        let posts = sqlx::query_as::<_, OwnPost>(
            r#"
            SELECT id, title, created_at
            FROM posts
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(posts)
    }

    /// Update a post owned by `owner_id`. Returns false when no such post
    /// belongs to that owner.
    pub async fn update(
        &self,
        id: i64,
        owner_id: i64,
        title: &PostTitle,
        body: &PostBody,
        html: &str,
    ) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET title = ?, content_md = ?, content_html = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(title.as_str())
        .bind(body.as_str())
        .bind(html)
        .bind(Utc::now())
        .bind(id)
        .bind(owner_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a post owned by `owner_id`. Returns false when nothing matched.
    pub async fn delete(&self, id: i64, owner_id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
