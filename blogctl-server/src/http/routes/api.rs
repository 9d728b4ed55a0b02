//! Read-only JSON API

use axum::extract::State;
use axum::{routing::get, Json, Router};

use crate::db::{Post, PostRepo, PostSummary};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiPagination, ApiPostId};
use crate::models::Paginated;
use crate::state::AppState;

/// GET /api/posts?page=&per_page=
async fn list_posts(
    State(state): State<AppState>,
    ApiPagination(params): ApiPagination,
) -> Result<Json<Paginated<PostSummary>>, ApiError> {
    let pagination = params.resolve(state.posts_per_page());
    let posts = PostRepo::new(state.pool()).list_page(pagination).await?;
    Ok(Json(posts))
}

/// GET /api/posts/{id}
async fn get_post(
    State(state): State<AppState>,
    ApiPostId(id): ApiPostId,
) -> Result<Json<Post>, ApiError> {
    let post = PostRepo::new(state.pool()).get(id).await?;
    Ok(Json(post))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/posts", get(list_posts))
        .route("/api/posts/{id}", get(get_post))
}
