//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sqlx::SqlitePool;

use crate::auth::session::{cookie_key, SessionSettings};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pool: SqlitePool,
    cookie_key: Key,
    session: SessionSettings,
    posts_per_page: u32,
    bcrypt_cost: u32,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        secret_key: &str,
        session: SessionSettings,
        posts_per_page: u32,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                pool,
                cookie_key: cookie_key(secret_key),
                session,
                posts_per_page,
                bcrypt_cost,
            }),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    pub fn session(&self) -> &SessionSettings {
        &self.inner.session
    }

    pub fn posts_per_page(&self) -> u32 {
        self.inner.posts_per_page
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.inner.bcrypt_cost
    }
}

/// Lets `SignedCookieJar` extract its key from the state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.inner.cookie_key.clone()
    }
}
