//! Post title and body validation

use super::ValidationError;

/// Maximum length for post titles
const MAX_TITLE_LEN: usize = 200;

/// Maximum length for Markdown bodies
const MAX_BODY_LEN: usize = 100_000;

/// Validated post title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTitle(String);

impl PostTitle {
    /// Create a new post title.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 200 characters
    ///
    /// # Example
    /// ```
    /// use blogctl_server::models::PostTitle;
    ///
    /// assert!(PostTitle::new("Hello").is_ok());
    /// assert!(PostTitle::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }

        if trimmed.chars().count() > MAX_TITLE_LEN {
            return Err(ValidationError::TooLong {
                field: "title",
                max: MAX_TITLE_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated Markdown source of a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostBody(String);

impl PostBody {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "content" });
        }

        if trimmed.chars().count() > MAX_BODY_LEN {
            return Err(ValidationError::TooLong {
                field: "content",
                max: MAX_BODY_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render to sanitized HTML
    pub fn to_html(&self) -> String {
        blogctl_core::render_markdown_safe(&self.0)
    }
}

/// Raw post form as submitted by the create/edit pages
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl PostForm {
    pub fn validate(&self) -> Result<(PostTitle, PostBody), Vec<ValidationError>> {
        match (PostTitle::new(&self.title), PostBody::new(&self.content)) {
            (Ok(title), Ok(body)) => Ok((title, body)),
            (title, body) => Err([title.err(), body.err()].into_iter().flatten().collect()),
        }
    }
}
