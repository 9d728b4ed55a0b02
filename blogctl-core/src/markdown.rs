//! Markdown to sanitized HTML
//!
//! Pipeline: parse Markdown (tables, footnotes, strikethrough), turn bare
//! URLs in plain text into links, serialize to HTML, then clean the result
//! against an allow-list. The cleaner runs last so nothing produced by the
//! earlier stages can bypass it.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use pulldown_cmark::{html, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream};
use regex::Regex;

/// Tags that survive sanitization. Everything else is stripped, keeping its text.
pub const ALLOWED_TAGS: &[&str] = &[
    "a",
    "abbr",
    "acronym",
    "b",
    "blockquote",
    "code",
    "em",
    "i",
    "li",
    "ol",
    "strong",
    "ul",
    "p",
    "pre",
    "br",
    "hr",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
];

/// Attributes allowed on `<a>`. No other tag keeps any attribute.
pub const ALLOWED_LINK_ATTRIBUTES: &[&str] = &["href", "title", "target"];

/// URL schemes allowed in `href`. Relative URLs pass through.
pub const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// `rel` forced onto every link
pub const LINK_REL: &str = "nofollow noopener noreferrer";

static BARE_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:https?://|www\.)[^\s<>"'`]+"#).expect("invalid url regex")
});

/// Convert Markdown to HTML that is safe to embed in a page.
///
/// # Example
/// ```
/// use blogctl_core::render_markdown_safe;
///
/// let html = render_markdown_safe("# Hi\n\n<script>alert(1)</script>");
/// assert!(html.contains("<h1>Hi</h1>"));
/// assert!(!html.contains("<script"));
/// ```
pub fn render_markdown_safe(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = TextMergeStream::new(Parser::new_ext(markdown, options));
    let events = linkify(parser);

    let mut raw = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut raw, events.into_iter());

    sanitize(&raw)
}

/// Clean arbitrary HTML against the allow-list.
pub fn sanitize(html: &str) -> String {
    let tags: HashSet<&str> = ALLOWED_TAGS.iter().copied().collect();
    let link_attributes: HashSet<&str> = ALLOWED_LINK_ATTRIBUTES.iter().copied().collect();
    let schemes: HashSet<&str> = ALLOWED_SCHEMES.iter().copied().collect();

    let mut builder = ammonia::Builder::default();
    builder
        .tags(tags)
        .clean_content_tags(["script", "style"].into_iter().collect())
        .tag_attributes(HashMap::from([("a", link_attributes)]))
        .generic_attributes(HashSet::new())
        .url_schemes(schemes)
        .link_rel(Some(LINK_REL))
        .strip_comments(true);

    builder.clean(html).to_string()
}

/// Rewrite plain-text events so bare URLs become links.
///
/// Text inside links, images, code blocks and raw `<a>` HTML is left alone.
fn linkify<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut out = Vec::new();
    let mut suppressed: usize = 0;
    let mut raw_anchors: usize = 0;

    for event in events {
        match event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. } | Tag::CodeBlock(_)) => {
                suppressed += 1;
                out.push(event);
            }
            Event::End(TagEnd::Link | TagEnd::Image | TagEnd::CodeBlock) => {
                suppressed = suppressed.saturating_sub(1);
                out.push(event);
            }
            Event::InlineHtml(ref raw) => {
                let lower = raw.to_ascii_lowercase();
                if lower.starts_with("<a ") || lower.starts_with("<a>") {
                    raw_anchors += 1;
                } else if lower.starts_with("</a") {
                    raw_anchors = raw_anchors.saturating_sub(1);
                }
                out.push(event);
            }
            Event::Text(text) if suppressed == 0 && raw_anchors == 0 => {
                push_linked_text(&mut out, text);
            }
            other => out.push(other),
        }
    }

    out
}

fn push_linked_text<'a>(out: &mut Vec<Event<'a>>, text: CowStr<'a>) {
    if !BARE_URL_RE.is_match(&text) {
        out.push(Event::Text(text));
        return;
    }

    let mut last = 0;
    for m in BARE_URL_RE.find_iter(&text) {
        let url = trim_trailing_punctuation(m.as_str());
        let Some(href) = href_for(url) else {
            continue;
        };
        let start = m.start();
        let end = start + url.len();

        if start > last {
            out.push(Event::Text(CowStr::from(text[last..start].to_string())));
        }

        out.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: CowStr::from(href),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        out.push(Event::Text(CowStr::from(url.to_string())));
        out.push(Event::End(TagEnd::Link));

        last = end;
    }

    if last < text.len() {
        out.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
}

/// Absolute link target for a bare URL, or `None` when trimming left no host
/// after the `www.` or `scheme://` prefix.
fn href_for(url: &str) -> Option<String> {
    let (href, host) = if url.is_char_boundary(4) && url[..4].eq_ignore_ascii_case("www.") {
        (format!("http://{}", url), &url[4..])
    } else {
        let (_, host) = url.split_once("://")?;
        (url.to_string(), host)
    };
    host.starts_with(char::is_alphanumeric).then_some(href)
}

/// Drop sentence punctuation glued to the end of a URL.
///
/// A closing paren is kept only when the URL contains a matching opener.
fn trim_trailing_punctuation(url: &str) -> &str {
    let mut end = url.len();
    loop {
        let current = &url[..end];
        let Some(last) = current.chars().last() else {
            return current;
        };
        let strip = match last {
            '.' | ',' | ';' | ':' | '!' | '?' | '\'' | '"' => true,
            ')' => current.matches('(').count() < current.matches(')').count(),
            _ => false,
        };
        if !strip {
            return current;
        }
        end -= last.len_utf8();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_basic_markdown() {
        let html = render_markdown_safe("# Title\n\nSome **bold** and *em* text.");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<em>em</em>"));
    }

    #[test]
    fn strips_script_and_its_content() {
        let html = render_markdown_safe("<script>alert(1)</script>\n\nafter");
        assert!(!html.contains("<script"));
        assert!(!html.contains("alert(1)"));
        assert!(html.contains("after"));
    }

    #[test]
    fn removes_javascript_urls() {
        let html = render_markdown_safe("[click](javascript:alert(1))");
        assert!(!html.contains("javascript:"));
        assert!(html.contains("click"));
    }

    #[test]
    fn removes_event_handlers_and_styles() {
        let html = render_markdown_safe(
            "<p style=\"color:red\" onclick=\"evil()\">hi <a href=\"https://ok.example\" onmouseover=\"x()\">ok</a></p>",
        );
        assert!(!html.contains("onclick"));
        assert!(!html.contains("onmouseover"));
        assert!(!html.contains("style="));
        assert!(html.contains("href=\"https://ok.example\""));
    }

    #[test]
    fn every_link_gets_rel() {
        let html = render_markdown_safe("[site](https://example.com)");
        assert!(html.contains("href=\"https://example.com\""));
        assert!(html.contains(&format!("rel=\"{}\"", LINK_REL)));
    }

    #[test]
    fn keeps_mailto_links() {
        let html = render_markdown_safe("[mail me](mailto:someone@example.com)");
        assert!(html.contains("href=\"mailto:someone@example.com\""));
    }

    #[test]
    fn linkifies_bare_urls() {
        let html = render_markdown_safe("Docs live at https://example.com/docs.");
        assert!(html.contains("href=\"https://example.com/docs\""));
        assert!(html.contains(">https://example.com/docs</a>."));
    }

    #[test]
    fn linkifies_www_with_http_prefix() {
        let html = render_markdown_safe("see www.example.org for more");
        assert!(html.contains("href=\"http://www.example.org\""));
        assert!(html.contains(">www.example.org</a>"));
    }

    #[test]
    fn keeps_balanced_parens_in_urls() {
        let html = render_markdown_safe("(see https://example.com/wiki/Rust_(language))");
        assert!(html.contains("href=\"https://example.com/wiki/Rust_(language)\""));
    }

    #[test]
    fn does_not_linkify_code() {
        let html = render_markdown_safe("`https://example.com`\n\n```\nhttps://example.org\n```");
        assert!(!html.contains("<a "));
        assert!(html.contains("<code>https://example.com</code>"));
        assert!(html.contains("<pre>"));
    }

    #[test]
    fn does_not_double_link() {
        let html = render_markdown_safe("[https://example.com](https://example.com)");
        assert_eq!(html.matches("<a ").count(), 1);
    }

    #[test]
    fn strips_tables_and_images_but_keeps_text() {
        let html = render_markdown_safe(
            "| a | b |\n|---|---|\n| one | two |\n\n![alt text](https://example.com/x.png)",
        );
        assert!(!html.contains("<table"));
        assert!(!html.contains("<td"));
        assert!(!html.contains("<img"));
        assert!(html.contains("one"));
        assert!(html.contains("two"));
    }

    #[test]
    fn strips_html_comments() {
        let html = render_markdown_safe("before <!-- hidden --> after");
        assert!(!html.contains("hidden"));
    }

    #[test]
    fn skips_urls_without_a_host() {
        let html = render_markdown_safe("see www.. now");
        assert!(!html.contains("<a"));
        assert!(html.contains("see www.. now"));

        let html = render_markdown_safe("try https://. or http://...");
        assert!(!html.contains("<a"));
    }

    #[test]
    fn href_for_requires_host() {
        assert_eq!(href_for("www.example.com").as_deref(), Some("http://www.example.com"));
        assert_eq!(href_for("https://example.com").as_deref(), Some("https://example.com"));
        assert_eq!(href_for("www"), None);
        assert_eq!(href_for("https://"), None);
        assert_eq!(href_for("www./x"), None);
    }

    #[test]
    fn trims_trailing_punctuation() {
        assert_eq!(trim_trailing_punctuation("https://a.example/x.,"), "https://a.example/x");
        assert_eq!(trim_trailing_punctuation("https://a.example/(x)"), "https://a.example/(x)");
        assert_eq!(trim_trailing_punctuation("https://a.example/x)"), "https://a.example/x");
    }
}
