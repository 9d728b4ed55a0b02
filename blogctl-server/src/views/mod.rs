//! Server-rendered HTML
//!
//! Pages are built as strings with `write!`. Every piece of user-supplied
//! text goes through [`escape`] or [`attr`]; the only raw HTML emitted is a
//! post's sanitized `content_html`.

pub mod auth;
pub mod error;
pub mod posts;

use std::fmt::Write;

use chrono::{DateTime, Datelike, Utc};

use crate::auth::{CurrentUser, Flash};

/// Per-request data every page needs
#[derive(Debug, Default)]
pub struct PageContext<'a> {
    pub viewer: Option<&'a CurrentUser>,
    pub flashes: Vec<Flash>,
}

impl<'a> PageContext<'a> {
    pub fn new(viewer: Option<&'a CurrentUser>, flashes: Vec<Flash>) -> Self {
        Self { viewer, flashes }
    }

    /// Add a message shown on this response only
    pub fn flash(mut self, flash: Flash) -> Self {
        self.flashes.push(flash);
        self
    }
}

/// Escape text content.
pub fn escape(s: &str) -> std::borrow::Cow<'_, str> {
    html_escape::encode_text(s)
}

/// Escape a double-quoted attribute value.
pub fn attr(s: &str) -> std::borrow::Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(s)
}

/// URL of the n-th front page.
pub fn page_url(page: u32) -> String {
    if page <= 1 {
        "/".to_string()
    } else {
        format!("/page/{}", page)
    }
}

pub(crate) fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// Wrap `body` in the site chrome.
pub fn layout(ctx: &PageContext<'_>, title: &str, body: &str) -> String {
    let mut html = String::with_capacity(body.len() + 2048);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{} | Blog</title>", escape(title));
    html.push_str("<link rel=\"stylesheet\" href=\"/static/style.css\">\n");
    html.push_str("</head>\n<body>\n");

    nav(&mut html, ctx.viewer);

    html.push_str("<main class=\"container\">\n");
    for flash in &ctx.flashes {
        let _ = writeln!(
            html,
            "<div class=\"flash flash-{}\" role=\"alert\">{}</div>",
            flash.level.as_str(),
            escape(&flash.message)
        );
    }
    html.push_str(body);
    html.push_str("</main>\n");

    let _ = writeln!(
        html,
        "<footer class=\"container\"><p>&copy; {} Blog</p></footer>",
        Utc::now().year()
    );
    html.push_str("</body>\n</html>\n");
    html
}

fn nav(html: &mut String, viewer: Option<&CurrentUser>) {
    html.push_str("<nav class=\"navbar\"><div class=\"container\">\n");
    html.push_str("<a class=\"brand\" href=\"/\">Blog</a>\n<ul>\n");
    html.push_str("<li><a href=\"/\">Home</a></li>\n");
    match viewer {
        Some(user) => {
            html.push_str("<li><a href=\"/create\">New post</a></li>\n");
            html.push_str("<li><a href=\"/profile\">Profile</a></li>\n");
            let _ = writeln!(
                html,
                "<li><form method=\"post\" action=\"/logout\" class=\"inline\">\
                 <button type=\"submit\" class=\"link\">Log out ({})</button></form></li>",
                escape(&user.username)
            );
        }
        None => {
            html.push_str("<li><a href=\"/login\">Log in</a></li>\n");
            html.push_str("<li><a href=\"/register\">Register</a></li>\n");
        }
    }
    html.push_str("</ul>\n</div></nav>\n");
}

#[cfg(test)]
pub(crate) fn test_user() -> CurrentUser {
    CurrentUser {
        id: 1,
        username: "alice".into(),
        email: "alice@example.com".into(),
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::FlashLevel;

    #[test]
    fn escapes_text_and_attributes() {
        assert_eq!(escape("<b>&</b>"), "&lt;b&gt;&amp;&lt;/b&gt;");
        assert_eq!(attr("a\"b"), "a&quot;b");
    }

    #[test]
    fn anonymous_nav() {
        let html = layout(&PageContext::default(), "Home", "");
        assert!(html.contains("href=\"/login\""));
        assert!(html.contains("href=\"/register\""));
        assert!(!html.contains("href=\"/create\""));
    }

    #[test]
    fn signed_in_nav() {
        let user = test_user();
        let html = layout(&PageContext::new(Some(&user), vec![]), "Home", "");
        assert!(html.contains("href=\"/create\""));
        assert!(html.contains("href=\"/profile\""));
        assert!(html.contains("Log out (alice)"));
        assert!(!html.contains("href=\"/register\""));
    }

    #[test]
    fn flashes_are_escaped() {
        let ctx = PageContext::default().flash(Flash::new(FlashLevel::Info, "<script>x</script>"));
        let html = layout(&ctx, "t", "");
        assert!(html.contains("flash-info"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>x"));
    }

    #[test]
    fn title_is_escaped() {
        let html = layout(&PageContext::default(), "<i>", "");
        assert!(html.contains("<title>&lt;i&gt; | Blog</title>"));
    }

    #[test]
    fn page_urls() {
        assert_eq!(page_url(0), "/");
        assert_eq!(page_url(1), "/");
        assert_eq!(page_url(3), "/page/3");
    }
}
