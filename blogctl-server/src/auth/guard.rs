//! Request guards
//!
//! `load_viewer` runs on every request and resolves the session cookie to a
//! user. `require_login` sits on protected routes only and bounces
//! anonymous visitors to the login page.

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::SignedCookieJar;

use super::flash::{self, FlashLevel};
use super::session;
use crate::db::{User, UserRepo};
use crate::http::error::PageError;
use crate::state::AppState;

/// The signed-in user, available to handlers behind `require_login`
pub type CurrentUser = User;

/// Who is looking at the page. Inserted into request extensions for
/// every request.
#[derive(Debug, Clone, Default)]
pub struct Viewer(pub Option<CurrentUser>);

impl Viewer {
    pub fn user(&self) -> Option<&CurrentUser> {
        self.0.as_ref()
    }

    /// True when the viewer is signed in as `user_id`
    pub fn is(&self, user_id: i64) -> bool {
        self.user().is_some_and(|u| u.id == user_id)
    }
}

/// Resolve the session cookie into a `Viewer` extension.
///
/// A session pointing at a user that no longer exists is treated as
/// anonymous.
pub async fn load_viewer(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let user = match session::user_id(&jar) {
        Some(id) => match UserRepo::new(state.pool()).find(id).await {
            Ok(user) => {
                if user.is_none() {
                    tracing::debug!(user_id = id, "Session refers to a missing user");
                }
                user
            }
            Err(e) => return PageError::from(e).into_response(),
        },
        None => None,
    };

    req.extensions_mut().insert(Viewer(user));
    next.run(req).await
}

/// Redirect anonymous requests to `/login?next=...`.
pub async fn require_login(jar: SignedCookieJar, mut req: Request, next: Next) -> Response {
    let user = req
        .extensions()
        .get::<Viewer>()
        .and_then(|viewer| viewer.0.clone());

    match user {
        Some(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        None => {
            // Only GETs are worth returning to after login
            let target = if req.method() == Method::GET {
                req.uri().path()
            } else {
                "/"
            };
            let jar = flash::push(jar, FlashLevel::Warning, "Please log in to continue.");
            (jar, Redirect::to(&login_url(target))).into_response()
        }
    }
}

/// Login page URL that returns to `next` afterwards.
pub fn login_url(next: &str) -> String {
    if next == "/" {
        "/login".to_string()
    } else {
        format!("/login?next={}", urlencoding::encode(next))
    }
}

/// Only honour local absolute paths as post-login targets.
///
/// Rejects scheme-relative (`//host`) and backslash tricks that browsers
/// treat as external.
pub fn safe_next(next: Option<&str>) -> String {
    match next {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path.to_string()
        }
        _ => "/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_next_accepts_local_paths() {
        assert_eq!(safe_next(Some("/create")), "/create");
        assert_eq!(safe_next(Some("/page/2?x=1")), "/page/2?x=1");
    }

    #[test]
    fn safe_next_rejects_external_targets() {
        assert_eq!(safe_next(None), "/");
        assert_eq!(safe_next(Some("")), "/");
        assert_eq!(safe_next(Some("https://evil.example")), "/");
        assert_eq!(safe_next(Some("//evil.example")), "/");
        assert_eq!(safe_next(Some("/\\evil.example")), "/");
        assert_eq!(safe_next(Some("/ok\r\nSet-Cookie: x")), "/");
    }

    #[test]
    fn login_url_encodes_next() {
        assert_eq!(login_url("/"), "/login");
        assert_eq!(login_url("/create"), "/login?next=%2Fcreate");
    }

    #[test]
    fn viewer_ownership() {
        let viewer = Viewer(Some(User {
            id: 3,
            username: "carol".into(),
            email: "carol@example.com".into(),
            created_at: chrono::Utc::now(),
        }));
        assert!(viewer.is(3));
        assert!(!viewer.is(4));
        assert!(!Viewer::default().is(3));
    }
}
