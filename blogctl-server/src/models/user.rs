//! Account field validation
//!
//! Lengths are counted in characters, not bytes, except for the password
//! upper bound which is a bcrypt byte limit.

use super::ValidationError;

const MIN_USERNAME_LEN: usize = 3;
const MAX_USERNAME_LEN: usize = 64;
const MAX_EMAIL_LEN: usize = 254;
const MIN_PASSWORD_LEN: usize = 6;
/// bcrypt only looks at the first 72 bytes
const MAX_PASSWORD_BYTES: usize = 72;

/// Validated username
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// Create a username.
    ///
    /// # Rules
    /// - Trimmed
    /// - 3 to 64 characters
    ///
    /// # Example
    /// ```
    /// use blogctl_server::models::Username;
    ///
    /// assert!(Username::new("  alice ").is_ok());
    /// assert!(Username::new("al").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        let len = trimmed.chars().count();

        if len == 0 {
            return Err(ValidationError::Empty { field: "username" });
        }
        if len < MIN_USERNAME_LEN {
            return Err(ValidationError::TooShort {
                field: "username",
                min: MIN_USERNAME_LEN,
            });
        }
        if len > MAX_USERNAME_LEN {
            return Err(ValidationError::TooLong {
                field: "username",
                max: MAX_USERNAME_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated, lowercased email address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// Create an email. Only a loose shape check is done: trimmed,
    /// lowercased, must contain `@`.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let normalized = s.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }
        if normalized.chars().count() > MAX_EMAIL_LEN {
            return Err(ValidationError::TooLong {
                field: "email",
                max: MAX_EMAIL_LEN,
            });
        }
        if !normalized.contains('@') {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "enter a valid email address",
            });
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Plain-text password that passed length checks. Never trimmed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "password" });
        }
        if s.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::TooShort {
                field: "password",
                min: MIN_PASSWORD_LEN,
            });
        }
        if s.len() > MAX_PASSWORD_BYTES {
            return Err(ValidationError::TooLong {
                field: "password",
                max: MAX_PASSWORD_BYTES,
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Raw registration input as submitted by the form
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct RegistrationForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Registration input after validation
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: Username,
    pub email: Email,
    pub password: Password,
}

impl RegistrationForm {
    /// Validate every field, reporting all problems at once.
    pub fn validate(&self) -> Result<Registration, Vec<ValidationError>> {
        let username = Username::new(&self.username);
        let email = Email::new(&self.email);
        let password = Password::new(&self.password);

        match (username, email, password) {
            (Ok(username), Ok(email), Ok(password)) => Ok(Registration {
                username,
                email,
                password,
            }),
            (username, email, password) => Err([
                username.err(),
                email.err(),
                password.err(),
            ]
            .into_iter()
            .flatten()
            .collect()),
        }
    }
}

/// Login form. The username is trimmed the same way registration trims it;
/// the password is checked exactly as typed.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Where to go after a successful login
    #[serde(default)]
    pub next: Option<String>,
}

impl LoginForm {
    /// Both fields present
    pub fn is_complete(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert_eq!(Username::new("  bob  ").unwrap().as_str(), "bob");
        assert!(matches!(
            Username::new("   ").unwrap_err(),
            ValidationError::Empty { .. }
        ));
        assert!(matches!(
            Username::new("ab").unwrap_err(),
            ValidationError::TooShort { min: 3, .. }
        ));
        // Multi-byte characters count once
        assert!(Username::new("жук").is_ok());
        assert!(matches!(
            Username::new(&"x".repeat(65)).unwrap_err(),
            ValidationError::TooLong { max: 64, .. }
        ));
    }

    #[test]
    fn email_is_normalized() {
        let email = Email::new("  Alice@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
    }

    #[test]
    fn email_requires_at_sign() {
        assert!(matches!(
            Email::new("not-an-email").unwrap_err(),
            ValidationError::InvalidFormat { field: "email", .. }
        ));
        assert!(matches!(
            Email::new("").unwrap_err(),
            ValidationError::Empty { field: "email" }
        ));
    }

    #[test]
    fn password_rules() {
        assert!(Password::new("secret").is_ok());
        assert!(matches!(
            Password::new("short").unwrap_err(),
            ValidationError::TooShort { min: 6, .. }
        ));
        assert!(matches!(
            Password::new(&"p".repeat(73)).unwrap_err(),
            ValidationError::TooLong { max: 72, .. }
        ));
        // Whitespace is significant
        assert_eq!(Password::new("  pass  ").unwrap().as_str(), "  pass  ");
    }

    #[test]
    fn password_debug_is_redacted() {
        let pw = Password::new("hunter22").unwrap();
        assert!(!format!("{:?}", pw).contains("hunter22"));
    }

    #[test]
    fn registration_collects_all_errors() {
        let form = RegistrationForm {
            username: "ab".into(),
            email: "nope".into(),
            password: "123".into(),
        };
        let errors = form.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(ValidationError::field).collect();
        assert_eq!(fields, vec!["username", "email", "password"]);
    }

    #[test]
    fn registration_ok() {
        let form = RegistrationForm {
            username: "alice".into(),
            email: "Alice@example.com".into(),
            password: "secret1".into(),
        };
        let reg = form.validate().unwrap();
        assert_eq!(reg.username.as_str(), "alice");
        assert_eq!(reg.email.as_str(), "alice@example.com");
    }

    #[test]
    fn login_form_completeness() {
        let mut form = LoginForm {
            username: "  ".into(),
            password: "pw".into(),
            next: None,
        };
        assert!(!form.is_complete());
        form.username = "alice".into();
        assert!(form.is_complete());
    }
}
