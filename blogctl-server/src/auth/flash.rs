//! One-shot messages carried across a redirect
//!
//! Stored as base64 JSON in a signed cookie. Messages pile up until a page
//! is rendered, which takes (and clears) them.

use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "blogctl_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Danger,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Danger, message)
    }
}

/// Pending messages without consuming them.
pub fn peek(jar: &SignedCookieJar) -> Vec<Flash> {
    jar.get(FLASH_COOKIE)
        .and_then(|cookie| decode(cookie.value()))
        .unwrap_or_default()
}

/// Queue a message for the next rendered page.
pub fn push(jar: SignedCookieJar, level: FlashLevel, message: impl Into<String>) -> SignedCookieJar {
    let mut flashes = peek(&jar);
    flashes.push(Flash::new(level, message));
    store(jar, &flashes)
}

/// Take all pending messages, clearing the cookie.
pub fn take(jar: SignedCookieJar) -> (SignedCookieJar, Vec<Flash>) {
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, Vec::new());
    }
    let flashes = peek(&jar);
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), flashes)
}

fn store(jar: SignedCookieJar, flashes: &[Flash]) -> SignedCookieJar {
    let Some(value) = encode(flashes) else {
        tracing::warn!("Dropping flash messages that failed to serialize");
        return jar;
    };

    let cookie = Cookie::build((FLASH_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    jar.add(cookie)
}

fn encode(flashes: &[Flash]) -> Option<String> {
    serde_json::to_vec(flashes)
        .ok()
        .map(|json| URL_SAFE_NO_PAD.encode(json))
}

fn decode(value: &str) -> Option<Vec<Flash>> {
    let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::cookie_key;

    fn jar() -> SignedCookieJar {
        SignedCookieJar::new(cookie_key("test-secret"))
    }

    #[test]
    fn push_accumulates() {
        let jar = push(jar(), FlashLevel::Info, "one");
        let jar = push(jar, FlashLevel::Danger, "two");

        assert_eq!(
            peek(&jar),
            vec![
                Flash::new(FlashLevel::Info, "one"),
                Flash::new(FlashLevel::Danger, "two"),
            ]
        );
    }

    #[test]
    fn take_clears() {
        let jar = push(jar(), FlashLevel::Success, "done");
        let (jar, flashes) = take(jar);
        assert_eq!(flashes.len(), 1);
        assert_eq!(flashes[0].message, "done");
        assert!(peek(&jar).is_empty());
    }

    #[test]
    fn take_on_empty_jar() {
        let (_, flashes) = take(jar());
        assert!(flashes.is_empty());
    }

    #[test]
    fn garbage_cookie_is_ignored() {
        assert!(decode("%%%not base64").is_none());
        assert!(decode(&URL_SAFE_NO_PAD.encode(b"not json")).is_none());
    }

    #[test]
    fn levels_serialize_lowercase() {
        let json = serde_json::to_string(&Flash::new(FlashLevel::Warning, "w")).unwrap();
        assert_eq!(json, r#"{"level":"warning","message":"w"}"#);
        assert_eq!(FlashLevel::Warning.as_str(), "warning");
    }
}
