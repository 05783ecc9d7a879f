use std::sync::{Arc, OnceLock};

use crate::error::{AppError, AuthError};

/// bcrypt-backed password hashing used by the user endpoints and login.
///
/// Hashing runs on the blocking pool so a slow cost factor never stalls the
/// request workers.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_hash: Arc<OnceLock<String>>,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            dummy_hash: Arc::new(OnceLock::new()),
        }
    }

    pub async fn hash(&self, plaintext: &str) -> Result<String, AppError> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost)).await??;
        Ok(hashed)
    }

    /// A malformed stored hash counts as a mismatch.
    pub async fn verify(&self, plaintext: &str, hash: &str) -> Result<(), AppError> {
        let plaintext = plaintext.to_owned();
        let hash = hash.to_owned();
        let matched = tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &hash)).await?;

        match matched {
            Ok(true) => Ok(()),
            _ => Err(AuthError::InvalidCredentials.into()),
        }
    }

    /// Spends the same work as [`verify`](Self::verify) when there is no
    /// stored hash to check against, then fails.
    pub async fn verify_absent(&self, plaintext: &str) -> Result<(), AppError> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;
        let dummy_hash = Arc::clone(&self.dummy_hash);

        tokio::task::spawn_blocking(move || {
            let hash = dummy_hash.get_or_init(|| bcrypt::hash("", cost).unwrap_or_default());
            let _ = bcrypt::verify(plaintext, hash);
        })
        .await?;

        Err(AuthError::InvalidCredentials.into())
    }

    #[cfg(test)]
    pub(crate) fn dummy_hash_ready(&self) -> bool {
        self.dummy_hash.get().is_some()
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_mismatch(result: Result<(), AppError>) -> bool {
        matches!(result, Err(AppError::AuthError(AuthError::InvalidCredentials)))
    }

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hasher = PasswordHasher::new(4);
        let hash = hasher.hash("04234").await.unwrap();

        assert_ne!(hash, "04234");
        assert!(hasher.verify("04234", &hash).await.is_ok());
        assert!(is_mismatch(hasher.verify("wrong", &hash).await));
    }

    #[tokio::test]
    async fn test_malformed_hash_is_mismatch() {
        let hasher = PasswordHasher::new(4);
        assert!(is_mismatch(hasher.verify("04234", "not-a-bcrypt-hash").await));
    }

    #[tokio::test]
    async fn test_absent_hash_still_does_the_work() {
        let hasher = PasswordHasher::new(4);

        assert!(is_mismatch(hasher.verify_absent("04234").await));
        let dummy = hasher.dummy_hash.get().expect("dummy hash is computed on first use");
        assert!(dummy.starts_with("$2b$04$"));

        // Clones share the cached hash.
        assert!(hasher.clone().dummy_hash.get().is_some());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_hashing_does_not_block_the_runtime() {
        let hasher = PasswordHasher::new(10);
        let ticker = tokio::spawn(async {
            let mut ticks = 0u32;
            while ticks < 5 {
                tokio::time::sleep(std::time::Duration::from_millis(1)).await;
                ticks += 1;
            }
            ticks
        });

        let hash = hasher.hash("04234").await.unwrap();
        assert!(ticker.is_finished());
        assert_eq!(ticker.await.unwrap(), 5);
        assert!(hasher.verify("04234", &hash).await.is_ok());
    }
}
