//! The signed-in user's profile page

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::{routing::get, Extension, Router};
use axum_extra::extract::cookie::SignedCookieJar;

use super::{page_context, render};
use crate::auth::{CurrentUser, Viewer};
use crate::db::PostRepo;
use crate::http::error::PageError;
use crate::state::AppState;
use crate::views;

/// GET /profile
async fn profile(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Extension(user): Extension<CurrentUser>,
    jar: SignedCookieJar,
) -> Result<Response, PageError> {
    let posts = PostRepo::new(state.pool()).list_for_user(user.id).await?;

    let (jar, ctx) = page_context(jar, &viewer);
    Ok(render(StatusCode::OK, jar, views::posts::profile(&ctx, &posts)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/profile", get(profile))
}
