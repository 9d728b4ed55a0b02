//! Salted password hashing (bcrypt)
//!
//! bcrypt is deliberately slow, so handlers call the `*_blocking` variants
//! which run on tokio's blocking pool.

use bcrypt::{hash, verify};

use super::AuthError;

pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    hash(password, cost).map_err(AuthError::from)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    verify(password, hash).map_err(AuthError::from)
}

pub async fn hash_password_blocking(password: String, cost: u32) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost)).await?
}

pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await?
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn hash_then_verify() {
        let hashed = hash_password("correct horse", TEST_COST).unwrap();
        assert_ne!(hashed, "correct horse");
        assert!(verify_password("correct horse", &hashed).unwrap());
        assert!(!verify_password("wrong horse", &hashed).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same", TEST_COST).unwrap();
        let b = hash_password("same", TEST_COST).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("pw", "not-a-bcrypt-hash").is_err());
    }

    #[tokio::test]
    async fn blocking_variants() {
        let hashed = hash_password_blocking("secret1".into(), TEST_COST)
            .await
            .unwrap();
        assert!(verify_password_blocking("secret1".into(), hashed)
            .await
            .unwrap());
    }
}
