//! Register and login forms

use std::fmt::Write;

use super::{attr, layout, PageContext};

/// Registration form. `username` and `email` are echoed back; the
/// password never is.
pub fn register(ctx: &PageContext<'_>, username: &str, email: &str) -> String {
    let mut body = String::new();
    body.push_str("<h1>Register</h1>\n");
    body.push_str("<form method=\"post\" action=\"/register\" class=\"stacked\">\n");
    let _ = writeln!(
        body,
        "<label for=\"username\">Username</label>\n\
         <input id=\"username\" name=\"username\" type=\"text\" required minlength=\"3\" \
         maxlength=\"64\" autocomplete=\"username\" value=\"{}\">",
        attr(username)
    );
    let _ = writeln!(
        body,
        "<label for=\"email\">Email</label>\n\
         <input id=\"email\" name=\"email\" type=\"email\" required autocomplete=\"email\" value=\"{}\">",
        attr(email)
    );
    body.push_str(
        "<label for=\"password\">Password</label>\n\
         <input id=\"password\" name=\"password\" type=\"password\" required minlength=\"6\" \
         autocomplete=\"new-password\">\n",
    );
    body.push_str("<button type=\"submit\">Create account</button>\n</form>\n");
    body.push_str("<p>Already registered? <a href=\"/login\">Log in</a>.</p>\n");

    layout(ctx, "Register", &body)
}

/// Login form. `next` is carried through as a hidden field.
pub fn login(ctx: &PageContext<'_>, username: &str, next: Option<&str>) -> String {
    let mut body = String::new();
    body.push_str("<h1>Log in</h1>\n");
    body.push_str("<form method=\"post\" action=\"/login\" class=\"stacked\">\n");
    if let Some(next) = next {
        let _ = writeln!(
            body,
            "<input type=\"hidden\" name=\"next\" value=\"{}\">",
            attr(next)
        );
    }
    let _ = writeln!(
        body,
        "<label for=\"username\">Username</label>\n\
         <input id=\"username\" name=\"username\" type=\"text\" required \
         autocomplete=\"username\" value=\"{}\">",
        attr(username)
    );
    body.push_str(
        "<label for=\"password\">Password</label>\n\
         <input id=\"password\" name=\"password\" type=\"password\" required \
         autocomplete=\"current-password\">\n",
    );
    body.push_str("<button type=\"submit\">Log in</button>\n</form>\n");
    body.push_str("<p>No account? <a href=\"/register\">Register</a>.</p>\n");

    layout(ctx, "Log in", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_echoes_escaped_values() {
        let html = register(&PageContext::default(), "\"><b>", "a@b.c");
        assert!(html.contains("value=\"&quot;"));
        assert!(!html.contains("\"><b>"));
        assert!(html.contains("value=\"a@b.c\""));
    }

    #[test]
    fn login_carries_next() {
        let html = login(&PageContext::default(), "", Some("/create"));
        assert!(html.contains("name=\"next\" value=\"/create\""));

        let html = login(&PageContext::default(), "", None);
        assert!(!html.contains("name=\"next\""));
    }
}
