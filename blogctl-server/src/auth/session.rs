//! Login state in a signed cookie
//!
//! The cookie holds only the user id. Its signature makes it tamper-proof;
//! the id is re-resolved against the database on every request.

use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use sha2::{Digest, Sha512};

use super::flash::FLASH_COOKIE;

pub const SESSION_COOKIE: &str = "blogctl_session";

const SECONDS_PER_DAY: i64 = 86_400;

/// Cookie attributes for the session
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub ttl: time::Duration,
    pub secure: bool,
}

impl SessionSettings {
    /// `ttl_days` saturates instead of overflowing the cookie duration.
    pub fn new(ttl_days: i64, secure: bool) -> Self {
        Self {
            ttl: time::Duration::seconds(ttl_days.saturating_mul(SECONDS_PER_DAY)),
            secure,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::new(14, false)
    }
}

/// Derive the signing key from the configured secret.
///
/// SHA-512 yields exactly the 64 bytes `Key::from` expects, whatever the
/// secret's length.
pub fn cookie_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// User id of the signed-in user, if the cookie is present and valid.
pub fn user_id(jar: &SignedCookieJar) -> Option<i64> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse().ok())
}

/// Start a session for `user_id`.
pub fn login(jar: SignedCookieJar, user_id: i64, settings: &SessionSettings) -> SignedCookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, user_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.secure)
        .max_age(settings.ttl);

    jar.add(cookie)
}

/// Drop the session and any pending flash messages.
pub fn logout(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
        .remove(Cookie::build(FLASH_COOKIE).path("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jar() -> SignedCookieJar {
        SignedCookieJar::new(cookie_key("test-secret"))
    }

    #[test]
    fn login_sets_user_id() {
        let jar = login(jar(), 7, &SessionSettings::default());
        assert_eq!(user_id(&jar), Some(7));

        let cookie = jar.get(SESSION_COOKIE).unwrap();
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn logout_clears_user_id() {
        let jar = login(jar(), 7, &SessionSettings::default());
        let jar = logout(jar);
        assert_eq!(user_id(&jar), None);
    }

    #[test]
    fn anonymous_has_no_user() {
        assert_eq!(user_id(&jar()), None);
    }

    #[test]
    fn key_is_deterministic() {
        assert_eq!(cookie_key("a").signing(), cookie_key("a").signing());
        assert_ne!(cookie_key("a").signing(), cookie_key("b").signing());
    }

    #[test]
    fn ttl_in_days() {
        assert_eq!(SessionSettings::new(14, false).ttl, time::Duration::days(14));
    }

    #[test]
    fn huge_ttl_does_not_panic() {
        let settings = SessionSettings::new(200_000_000_000_000, false);
        assert!(settings.ttl > time::Duration::days(3650));
    }
}
