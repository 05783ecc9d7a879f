//! In-memory repositories for tests and local runs without Postgres.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::refresh::RefreshTokenStore;
use crate::db::models::{Chirp, RefreshToken, User};
use crate::db::{ChirpRepository, UserRepository};
use crate::error::{AuthError, DatabaseError};
use crate::Result;

#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    refresh_tokens: Arc<RwLock<HashMap<String, RefreshToken>>>,
    // Insertion order doubles as creation order.
    chirps: Arc<RwLock<Vec<Chirp>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, user: &User) -> Result<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) || users.contains_key(&user.id) {
            return Err(DatabaseError::Duplicate.into());
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn update_user(&self, id: Uuid, email: &str, hashed_password: &str) -> Result<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == email && u.id != id) {
            return Err(DatabaseError::Duplicate.into());
        }
        let user = users.get_mut(&id).ok_or(DatabaseError::NotFound)?;
        user.email = email.to_string();
        user.hashed_password = hashed_password.to_string();
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> Result<User> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(DatabaseError::NotFound)?;
        user.is_chirpy_red = true;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryStore {
    async fn create_refresh_token(&self, token: &RefreshToken) -> Result<RefreshToken> {
        let mut tokens = self.refresh_tokens.write().await;
        if tokens.contains_key(&token.token) {
            return Err(DatabaseError::Duplicate.into());
        }
        tokens.insert(token.token.clone(), token.clone());
        Ok(token.clone())
    }

    async fn get_refresh_token(&self, token: &str) -> Result<RefreshToken> {
        let tokens = self.refresh_tokens.read().await;
        tokens.get(token).cloned().ok_or_else(|| AuthError::NotFound.into())
    }

    async fn revoke_refresh_token(&self, token: &str, now: DateTime<Utc>) -> Result<()> {
        let mut tokens = self.refresh_tokens.write().await;
        let record = tokens.get_mut(token).ok_or(AuthError::NotFound)?;
        record.revoke(now);
        Ok(())
    }
}

#[async_trait]
impl ChirpRepository for MemoryStore {
    async fn create_chirp(&self, chirp: &Chirp) -> Result<Chirp> {
        self.chirps.write().await.push(chirp.clone());
        Ok(chirp.clone())
    }

    async fn list_chirps(&self, author_id: Option<Uuid>) -> Result<Vec<Chirp>> {
        let chirps = self.chirps.read().await;
        let mut found: Vec<Chirp> = chirps
            .iter()
            .filter(|c| author_id.map_or(true, |id| c.user_id == id))
            .cloned()
            .collect();
        found.sort_by_key(|c| c.created_at);
        Ok(found)
    }

    async fn get_chirp(&self, id: Uuid) -> Result<Option<Chirp>> {
        let chirps = self.chirps.read().await;
        Ok(chirps.iter().find(|c| c.id == id).cloned())
    }

    async fn delete_chirp(&self, id: Uuid) -> Result<()> {
        let mut chirps = self.chirps.write().await;
        let before = chirps.len();
        chirps.retain(|c| c.id != id);
        if chirps.len() == before {
            return Err(DatabaseError::NotFound.into());
        }
        Ok(())
    }
}
