//! Authentication: password hashing, session cookie, flash messages, guards

pub mod flash;
pub mod guard;
pub mod password;
pub mod session;

pub use flash::{Flash, FlashLevel};
pub use guard::{load_viewer, require_login, safe_next, CurrentUser, Viewer};
pub use session::SessionSettings;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("password task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
