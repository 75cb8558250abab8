//! Password hashing using argon2
//!
//! Argon2id with a fresh salt per password. The work is CPU-bound, so the
//! public API always routes through the blocking pool and the sync bodies
//! stay private.

use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Password hashing service
pub struct PasswordService;

impl PasswordService {
    pub async fn hash_async(password: String) -> Result<String> {
        run_blocking(move || hash_blocking(&password)).await
    }

    pub async fn verify_async(password: String, hash: String) -> Result<bool> {
        run_blocking(move || verify_blocking(&password, &hash)).await
    }
}

async fn run_blocking<T>(f: impl FnOnce() -> Result<T> + Send + 'static) -> Result<T>
where
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| anyhow::anyhow!("blocking task join error: {}", e))?
}

fn hash_blocking(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hash failure: {}", e))?;
    Ok(hash.to_string())
}

fn verify_blocking(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("stored password hash unreadable: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verifies_only_the_original() {
        let hash = hash_blocking("journal_password_123").unwrap();

        assert!(verify_blocking("journal_password_123", &hash).unwrap());
        assert!(!verify_blocking("journal_password_124", &hash).unwrap());
    }

    #[test]
    fn test_salts_make_hashes_unique() {
        let first = hash_blocking("same input").unwrap();
        let second = hash_blocking("same input").unwrap();

        assert_ne!(first, second);
        assert!(verify_blocking("same input", &first).unwrap());
        assert!(verify_blocking("same input", &second).unwrap());
    }

    #[test]
    fn test_corrupt_stored_hash_is_an_error() {
        assert!(verify_blocking("anything", "not-a-phc-string").is_err());
    }

    #[tokio::test]
    async fn test_async_wrappers_round_trip() {
        let hash = PasswordService::hash_async("async password".into())
            .await
            .unwrap();

        let ok = PasswordService::verify_async("async password".into(), hash.clone())
            .await
            .unwrap();
        let bad = PasswordService::verify_async("other".into(), hash)
            .await
            .unwrap();

        assert!(ok);
        assert!(!bad);
    }
}
