use actix_web::http::header::HeaderMap;
use chrono::{Duration, Utc};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::gate;
use crate::auth::password::PasswordHasher;
use crate::auth::refresh::{ensure_usable, generate_refresh_token, refresh_token_ttl, RefreshTokenStore};
use crate::auth::token::AccessTokenCodec;
use crate::config::Settings;
use crate::db::models::{RefreshToken, User};
use crate::db::UserRepository;
use crate::error::{AppError, AuthError, DatabaseError};
use crate::Result;

/// Credentials handed to a client at login.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issues, refreshes and revokes sessions, and resolves request identities.
pub struct AuthService {
    codec: AccessTokenCodec,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    users: Arc<dyn UserRepository>,
    passwords: PasswordHasher,
    access_token_ttl: Duration,
    storage_timeout: std::time::Duration,
}

impl AuthService {
    pub fn new(
        codec: AccessTokenCodec,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        users: Arc<dyn UserRepository>,
        passwords: PasswordHasher,
        access_token_ttl: Duration,
        storage_timeout: std::time::Duration,
    ) -> Self {
        Self {
            codec,
            refresh_tokens,
            users,
            passwords,
            access_token_ttl,
            storage_timeout,
        }
    }

    pub fn from_settings(
        settings: &Settings,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        users: Arc<dyn UserRepository>,
    ) -> Result<Self> {
        Ok(Self::new(
            AccessTokenCodec::new(settings.auth.jwt_secret.as_bytes())?,
            refresh_tokens,
            users,
            PasswordHasher::new(settings.auth.bcrypt_cost),
            Duration::seconds(settings.auth.access_token_ttl_seconds),
            std::time::Duration::from_millis(settings.database.timeout_ms),
        ))
    }

    pub fn passwords(&self) -> &PasswordHasher {
        &self.passwords
    }

    pub fn codec(&self) -> &AccessTokenCodec {
        &self.codec
    }

    /// Access token lifetime for a login request. Requests longer than the
    /// configured lifetime are clamped; absent or non-positive ones get it.
    pub fn access_token_ttl(&self, requested_seconds: Option<i64>) -> Duration {
        match requested_seconds {
            Some(seconds) if seconds > 0 => {
                Duration::seconds(seconds.min(self.access_token_ttl.num_seconds()))
            }
            _ => self.access_token_ttl,
        }
    }

    pub fn resolve_identity(&self, headers: &HeaderMap) -> std::result::Result<Uuid, AuthError> {
        gate::resolve_identity(headers, &self.codec)
    }

    /// Checks email and password, then issues a session. An unknown email and
    /// a wrong password fail the same way and cost the same bcrypt work.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        expires_in_seconds: Option<i64>,
    ) -> Result<(User, Session)> {
        let user = match self.bounded(self.users.get_user_by_email(email)).await? {
            Some(user) => user,
            None => {
                self.passwords.verify_absent(password).await?;
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        self.passwords.verify(password, &user.hashed_password).await?;

        let session = self
            .issue_session(user.id, self.access_token_ttl(expires_in_seconds))
            .await?;
        info!(user_id = %user.id, "Issued session");

        Ok((user, session))
    }

    pub async fn issue_session(&self, user_id: Uuid, ttl: Duration) -> Result<Session> {
        let access_token = self.codec.issue(user_id, ttl)?;

        let record = RefreshToken::new(generate_refresh_token(), user_id, refresh_token_ttl());
        self.bounded(self.refresh_tokens.create_refresh_token(&record)).await?;

        Ok(Session {
            access_token,
            refresh_token: record.token,
        })
    }

    /// Mints a new access token for a live refresh token.
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<String> {
        let record = self.lookup_refresh_token(refresh_token).await?;

        if let Err(reason) = ensure_usable(&record, Utc::now()) {
            debug!(user_id = %record.user_id, %reason, "Refusing refresh");
            return Err(reason.into());
        }

        self.codec.issue(record.user_id, self.access_token_ttl)
    }

    pub async fn revoke_session(&self, refresh_token: &str) -> Result<()> {
        self.bounded(self.refresh_tokens.revoke_refresh_token(refresh_token, Utc::now()))
            .await
    }

    /// Raw record, without liveness checks.
    pub async fn lookup_refresh_token(&self, refresh_token: &str) -> Result<RefreshToken> {
        self.bounded(self.refresh_tokens.get_refresh_token(refresh_token)).await
    }

    /// Runs one storage round-trip under the configured deadline.
    async fn bounded<T, F>(&self, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.storage_timeout, operation).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout_ms = self.storage_timeout.as_millis() as u64, "Storage operation timed out");
                Err(AppError::DatabaseError(DatabaseError::Timeout))
            }
        }
    }
}
