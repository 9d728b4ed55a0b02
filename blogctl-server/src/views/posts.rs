//! Post pages: front page, single post, editor, profile

use std::fmt::Write;

use chrono::{DateTime, Utc};

use super::{attr, escape, format_date, layout, page_url, PageContext};
use crate::db::{OwnPost, Post, PostSummary};
use crate::models::Paginated;

/// Which editor is being shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(i64),
}

impl EditorMode {
    fn action(&self) -> String {
        match self {
            Self::Create => "/create".to_string(),
            Self::Edit(id) => format!("/edit/{}", id),
        }
    }

    fn heading(&self) -> &'static str {
        match self {
            Self::Create => "New post",
            Self::Edit(_) => "Edit post",
        }
    }
}

/// Front page listing.
pub fn index(ctx: &PageContext<'_>, page: &Paginated<PostSummary>) -> String {
    let mut body = String::new();
    body.push_str("<h1>Latest posts</h1>\n");

    if page.items.is_empty() {
        body.push_str("<p class=\"empty\">No posts yet.</p>\n");
    }

    for post in &page.items {
        body.push_str("<article class=\"post\">\n");
        let _ = writeln!(
            body,
            "<h2><a href=\"/post/{}\">{}</a></h2>",
            post.id,
            escape(&post.title)
        );
        byline(&mut body, &post.author, &post.created_at, post.updated_at.as_ref());
        let _ = writeln!(body, "<div class=\"content\">{}</div>", post.content_html);
        if ctx.viewer.is_some_and(|u| u.id == post.user_id) {
            let _ = writeln!(body, "<p><a href=\"/edit/{}\">Edit</a></p>", post.id);
        }
        body.push_str("</article>\n");
    }

    pager(&mut body, page);
    layout(ctx, "Home", &body)
}

fn byline(
    body: &mut String,
    author: &str,
    created_at: &DateTime<Utc>,
    updated_at: Option<&DateTime<Utc>>,
) {
    let _ = write!(
        body,
        "<p class=\"meta\">by {} on {}",
        escape(author),
        format_date(created_at)
    );
    if let Some(updated) = updated_at {
        let _ = write!(body, " (updated {})", format_date(updated));
    }
    body.push_str("</p>\n");
}

fn pager<T>(body: &mut String, page: &Paginated<T>) {
    let total_pages = page.total_pages();
    if total_pages <= 1 && page.page <= 1 {
        return;
    }

    body.push_str("<nav class=\"pagination\">\n");
    if page.has_prev() {
        let _ = writeln!(
            body,
            "<a href=\"{}\" rel=\"prev\">&laquo; Newer</a>",
            page_url(page.page - 1)
        );
    }
    let _ = writeln!(
        body,
        "<span>Page {} of {}</span>",
        page.page, total_pages
    );
    if page.has_next() {
        let _ = writeln!(
            body,
            "<a href=\"{}\" rel=\"next\">Older &raquo;</a>",
            page_url(page.page + 1)
        );
    }
    body.push_str("</nav>\n");
}

/// Single post page.
pub fn show(ctx: &PageContext<'_>, post: &Post) -> String {
    let mut body = String::new();
    body.push_str("<article class=\"post\">\n");
    let _ = writeln!(body, "<h1>{}</h1>", escape(&post.title));
    byline(&mut body, &post.author, &post.created_at, post.updated_at.as_ref());
    let _ = writeln!(body, "<div class=\"content\">{}</div>", post.content_html);
    if ctx.viewer.is_some_and(|u| u.id == post.user_id) {
        let _ = writeln!(body, "<p><a href=\"/edit/{}\">Edit</a></p>", post.id);
    }
    body.push_str("</article>\n");

    layout(ctx, &post.title, &body)
}

/// Create or edit form. Values are echoed back after a failed submit.
pub fn editor(ctx: &PageContext<'_>, mode: EditorMode, title: &str, content: &str) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>{}</h1>", mode.heading());
    let _ = writeln!(
        body,
        "<form method=\"post\" action=\"{}\" class=\"stacked\">",
        mode.action()
    );
    let _ = writeln!(
        body,
        "<label for=\"title\">Title</label>\n\
         <input id=\"title\" name=\"title\" type=\"text\" maxlength=\"200\" required value=\"{}\">",
        attr(title)
    );
    let _ = writeln!(
        body,
        "<label for=\"content\">Content (Markdown)</label>\n\
         <textarea id=\"content\" name=\"content\" rows=\"16\" required>{}</textarea>",
        escape(content)
    );
    body.push_str("<button type=\"submit\">Save</button>\n</form>\n");

    if let EditorMode::Edit(id) = mode {
        let _ = writeln!(
            body,
            "<form method=\"post\" action=\"/delete/{}\" class=\"inline danger-zone\" \
             onsubmit=\"return confirm('Delete this post?');\">\
             <button type=\"submit\" class=\"danger\">Delete post</button></form>",
            id
        );
    }

    layout(ctx, mode.heading(), &body)
}

/// The signed-in user's own posts.
pub fn profile(ctx: &PageContext<'_>, posts: &[OwnPost]) -> String {
    let mut body = String::new();
    let name = ctx.viewer.map(|u| u.username.as_str()).unwrap_or_default();
    let _ = writeln!(body, "<h1>{}</h1>", escape(name));
    if let Some(user) = ctx.viewer {
        let _ = writeln!(
            body,
            "<p class=\"meta\">{} &middot; member since {}</p>",
            escape(&user.email),
            user.created_at.format("%Y-%m-%d")
        );
    }

    let _ = writeln!(body, "<h2>Your posts ({})</h2>", posts.len());
    if posts.is_empty() {
        body.push_str("<p class=\"empty\">You have not written anything yet. <a href=\"/create\">Write a post</a>.</p>\n");
    } else {
        body.push_str("<ul class=\"own-posts\">\n");
        for post in posts {
            let _ = writeln!(
                body,
                "<li><a href=\"/post/{id}\">{title}</a> <span class=\"meta\">{date}</span> \
                 <a href=\"/edit/{id}\">Edit</a></li>",
                id = post.id,
                title = escape(&post.title),
                date = format_date(&post.created_at)
            );
        }
        body.push_str("</ul>\n");
    }

    layout(ctx, "Profile", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::test_user;

    fn summary(id: i64, user_id: i64, title: &str) -> PostSummary {
        PostSummary {
            id,
            title: title.into(),
            content_html: "<p>hi</p>".into(),
            created_at: Utc::now(),
            updated_at: None,
            user_id,
            author: "alice".into(),
        }
    }

    fn page_of(items: Vec<PostSummary>, total: i64, page: u32) -> Paginated<PostSummary> {
        Paginated {
            items,
            total,
            page,
            per_page: 5,
        }
    }

    #[test]
    fn empty_index() {
        let html = index(&PageContext::default(), &page_of(vec![], 0, 1));
        assert!(html.contains("No posts yet."));
        assert!(!html.contains("class=\"pagination\""));
    }

    #[test]
    fn index_escapes_title_but_not_content() {
        let html = index(
            &PageContext::default(),
            &page_of(vec![summary(1, 1, "<script>")], 1, 1),
        );
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("<p>hi</p>"));
    }

    #[test]
    fn show_marks_edited_posts() {
        let created = DateTime::parse_from_rfc3339("2024-03-01T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut post = Post {
            id: 4,
            title: "Edited".into(),
            content_md: "hi".into(),
            content_html: "<p>hi</p>".into(),
            created_at: created,
            updated_at: None,
            user_id: 1,
            author: "alice".into(),
        };
        let html = show(&PageContext::default(), &post);
        assert!(html.contains("by alice on 2024-03-01 09:30</p>"));
        assert!(!html.contains("(updated "));

        post.updated_at = Some(created + chrono::Duration::hours(2));
        let html = show(&PageContext::default(), &post);
        assert!(html.contains("(updated 2024-03-01 11:30)"));
    }

    #[test]
    fn edit_link_only_for_owner() {
        let user = test_user();
        let page = page_of(vec![summary(1, 1, "mine"), summary(2, 2, "theirs")], 2, 1);
        let html = index(&PageContext::new(Some(&user), vec![]), &page);
        assert!(html.contains("href=\"/edit/1\""));
        assert!(!html.contains("href=\"/edit/2\""));
    }

    #[test]
    fn middle_page_has_both_links() {
        let html = index(&PageContext::default(), &page_of(vec![summary(1, 1, "x")], 12, 2));
        assert!(html.contains("Page 2 of 3"));
        assert!(html.contains("href=\"/\" rel=\"prev\""));
        assert!(html.contains("href=\"/page/3\" rel=\"next\""));
    }

    #[test]
    fn page_past_the_end_keeps_nav() {
        let html = index(&PageContext::default(), &page_of(vec![], 3, 4));
        assert!(html.contains("No posts yet."));
        assert!(html.contains("Page 4 of 1"));
        assert!(html.contains("href=\"/page/3\" rel=\"prev\""));
    }

    #[test]
    fn editor_keeps_values() {
        let html = editor(&PageContext::default(), EditorMode::Create, "a \"b\"", "<x>");
        assert!(html.contains("action=\"/create\""));
        assert!(html.contains("value=\"a &quot;b&quot;\""));
        assert!(html.contains("&lt;x&gt;</textarea>"));
        assert!(!html.contains("/delete/"));
    }

    #[test]
    fn edit_form_has_delete() {
        let html = editor(&PageContext::default(), EditorMode::Edit(7), "t", "c");
        assert!(html.contains("action=\"/edit/7\""));
        assert!(html.contains("action=\"/delete/7\""));
    }

    #[test]
    fn profile_lists_posts() {
        let user = test_user();
        let posts = vec![OwnPost {
            id: 4,
            title: "First".into(),
            created_at: Utc::now(),
        }];
        let html = profile(&PageContext::new(Some(&user), vec![]), &posts);
        assert!(html.contains("Your posts (1)"));
        assert!(html.contains("href=\"/post/4\">First</a>"));
    }
}
