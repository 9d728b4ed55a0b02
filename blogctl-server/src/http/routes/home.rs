//! Public reading routes: front page, pagination, single post

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::{routing::get, Extension, Router};
use axum_extra::extract::cookie::SignedCookieJar;

use super::{page_context, render};
use crate::auth::Viewer;
use crate::db::PostRepo;
use crate::http::error::PageError;
use crate::http::extractors::{PageNumber, PostId};
use crate::models::Pagination;
use crate::state::AppState;
use crate::views;

/// GET /
async fn index(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    jar: SignedCookieJar,
) -> Result<Response, PageError> {
    list(&state, &viewer, jar, 1).await
}

/// GET /page/{n}
async fn page(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    jar: SignedCookieJar,
    PageNumber(n): PageNumber,
) -> Result<Response, PageError> {
    list(&state, &viewer, jar, n).await
}

async fn list(
    state: &AppState,
    viewer: &Viewer,
    jar: SignedCookieJar,
    page: u32,
) -> Result<Response, PageError> {
    let pagination = Pagination::new(page, state.posts_per_page());
    let posts = PostRepo::new(state.pool()).list_page(pagination).await?;

    let (jar, ctx) = page_context(jar, viewer);
    Ok(render(StatusCode::OK, jar, views::posts::index(&ctx, &posts)))
}

/// GET /post/{id}
async fn show(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    jar: SignedCookieJar,
    PostId(id): PostId,
) -> Result<Response, PageError> {
    let post = PostRepo::new(state.pool()).get(id).await?;

    let (jar, ctx) = page_context(jar, &viewer);
    Ok(render(StatusCode::OK, jar, views::posts::show(&ctx, &post)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/page/{n}", get(page))
        .route("/post/{id}", get(show))
}
