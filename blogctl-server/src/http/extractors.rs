//! Custom Axum extractors

use axum::extract::{FromRequestParts, Path, Query};
use axum::http::request::Parts;

use super::error::{ApiError, PageError};
use crate::models::{PaginationParams, ValidationError};

/// Page number from `/page/{n}`. Zero is clamped later; anything that is not
/// a non-negative integer is a 404.
pub struct PageNumber(pub u32);

impl<S> FromRequestParts<S> for PageNumber
where
    S: Send + Sync,
{
    type Rejection = PageError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| PageError::not_found("page", ""))?;

        raw.parse::<u32>()
            .map(Self)
            .map_err(|_| PageError::not_found("page", raw))
    }
}

/// Post id from `/post/{id}`, `/edit/{id}`, `/delete/{id}`. Any integer
/// parses; ids with no row are handled by the route.
pub struct PostId(pub i64);

impl<S> FromRequestParts<S> for PostId
where
    S: Send + Sync,
{
    type Rejection = PageError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| PageError::not_found("post", ""))?;

        raw.parse::<i64>()
            .map(Self)
            .map_err(|_| PageError::not_found("post", raw))
    }
}

/// Post id from `/api/posts/{id}`, rejected as JSON.
pub struct ApiPostId(pub i64);

impl<S> FromRequestParts<S> for ApiPostId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Empty { field: "id" }))?;

        raw.parse::<i64>().map(Self).map_err(|_| {
            ApiError::Validation(ValidationError::InvalidFormat {
                field: "id",
                reason: "must be an integer",
            })
        })
    }
}

/// `?page=&per_page=` for the JSON API, rejected as JSON.
pub struct ApiPagination(pub PaginationParams);

impl<S> FromRequestParts<S> for ApiPagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                ApiError::Validation(ValidationError::InvalidFormat {
                    field: "page",
                    reason: "page and per_page must be non-negative integers",
                })
            })?;
        Ok(Self(params))
    }
}
