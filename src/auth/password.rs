//! Password hashing

use crate::error::{Error, Result};

/// Hash a password with bcrypt at the given cost
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Check a password against a stored bcrypt hash
///
/// A malformed hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!("Stored password hash could not be verified: {}", e);
            false
        }
    }
}

/// [`hash_password`] on the blocking thread pool
pub async fn hash_password_blocking(password: String, cost: u32) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| Error::Other(format!("Password hashing task failed: {}", e)))?
}

/// [`verify_password`] on the blocking thread pool
pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| Error::Other(format!("Password verification task failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Lowest cost bcrypt accepts, keeps tests fast
    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("hunter2", TEST_COST).expect("Failed to hash");
        assert_ne!(hash, "hunter2");
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn test_malformed_hash_does_not_verify() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }

    #[tokio::test]
    async fn test_hashing_does_not_block_the_runtime() {
        // Slow enough that the first poll cannot finish it inline
        let mut hashing = Box::pin(hash_password_blocking("hunter2".to_string(), 10));

        tokio::select! {
            biased;
            _ = &mut hashing => panic!("Hashing finished on the first poll"),
            _ = std::future::ready(()) => {}
        }

        let hash = hashing.await.expect("Failed to hash");
        let matches = verify_password_blocking("hunter2".to_string(), hash.clone())
            .await
            .expect("Verification task failed");
        assert!(matches);

        let matches = verify_password_blocking("hunter3".to_string(), hash)
            .await
            .expect("Verification task failed");
        assert!(!matches);
    }
}
