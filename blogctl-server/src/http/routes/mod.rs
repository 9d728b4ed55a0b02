//! Route handlers organized by resource

pub mod api;
pub mod assets;
pub mod auth;
pub mod health;
pub mod home;
pub mod posts;
pub mod profile;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::cookie::SignedCookieJar;

use crate::auth::{flash, Flash, Viewer};
use crate::views::PageContext;

/// Take the pending flashes out of the jar and pair them with the viewer.
pub(crate) fn page_context(jar: SignedCookieJar, viewer: &Viewer) -> (SignedCookieJar, PageContext<'_>) {
    let (jar, flashes) = flash::take(jar);
    (jar, PageContext::new(viewer.user(), flashes))
}

/// Render a page, clearing the flashes it displayed.
pub(crate) fn render(status: StatusCode, jar: SignedCookieJar, html: String) -> Response {
    (status, jar, Html(html)).into_response()
}

/// Flash messages for a failed form submission, one per problem.
pub(crate) fn error_flashes<E: ToString>(errors: &[E]) -> Vec<Flash> {
    errors.iter().map(|e| Flash::danger(e.to_string())).collect()
}
