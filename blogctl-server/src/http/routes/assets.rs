//! Embedded stylesheet

use axum::http::header;
use axum::response::IntoResponse;
use axum::{routing::get, Router};

use crate::state::AppState;

const STYLE_CSS: &str = include_str!("../../../static/style.css");

/// GET /static/style.css
async fn style() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/css; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        STYLE_CSS,
    )
}

pub fn router() -> Router<AppState> {
    Router::new().route("/static/style.css", get(style))
}
