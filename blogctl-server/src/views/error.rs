//! Error page

use axum::http::StatusCode;

use super::{escape, layout, PageContext};

/// Standalone error page. Rendered without viewer or flashes since it can
/// be produced before either is known.
pub fn page(status: StatusCode, message: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        "<h1>{} {}</h1>\n<p>{}</p>\n<p><a href=\"/\">Back to the front page</a></p>\n",
        status.as_u16(),
        escape(reason),
        escape(message)
    );
    layout(&PageContext::default(), reason, &body)
}
