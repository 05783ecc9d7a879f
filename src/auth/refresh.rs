//! Opaque refresh tokens.
//!
//! A refresh token carries no signature, so its unguessability comes entirely
//! from the 256 bits of randomness behind it. Liveness lives in storage.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;

use crate::db::models::{RefreshToken, RefreshTokenState};
use crate::error::AuthError;
use crate::Result;

/// Random bytes drawn per token. Hex encoding doubles the length.
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Validity window for every refresh token.
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 60;

pub fn refresh_token_ttl() -> Duration {
    Duration::days(REFRESH_TOKEN_TTL_DAYS)
}

/// Returns a 64 character lowercase hex string from a CSPRNG.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Persistence contract for refresh tokens.
///
/// Each operation touches a single row keyed by the exact token value, so the
/// storage layer's own single-row atomicity is all the coordination needed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Inserts a new record. Fails with `DatabaseError::Duplicate` if the
    /// token value already exists.
    async fn create_refresh_token(&self, token: &RefreshToken) -> Result<RefreshToken>;

    /// Raw lookup. Fails with `AuthError::NotFound` when no record has this
    /// exact value; revoked and expired records are returned as-is.
    async fn get_refresh_token(&self, token: &str) -> Result<RefreshToken>;

    /// Stamps `revoked_at` and `updated_at`. Revoking twice is not an error.
    /// Fails with `AuthError::NotFound` for unknown tokens.
    async fn revoke_refresh_token(&self, token: &str, now: DateTime<Utc>) -> Result<()>;
}

/// Policy check layered on top of the raw lookup.
pub fn ensure_usable(record: &RefreshToken, now: DateTime<Utc>) -> std::result::Result<(), AuthError> {
    match record.state_at(now) {
        RefreshTokenState::Active => Ok(()),
        RefreshTokenState::Revoked => Err(AuthError::Revoked),
        RefreshTokenState::Expired => Err(AuthError::Expired),
    }
}
