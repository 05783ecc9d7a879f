//! Database module for the Chirpy server
//!
//! Repository contracts for users and chirps, plus the Postgres and
//! in-memory implementations of every repository the service uses.

pub mod memory;
pub mod models;
pub mod operations;

use async_trait::async_trait;
use uuid::Uuid;

use crate::Result;

pub use memory::MemoryStore;
pub use models::{Chirp, RefreshToken, RefreshTokenState, User};
pub use operations::DbOperations;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DatabaseError::Duplicate` when the email is taken.
    async fn create_user(&self, user: &User) -> Result<User>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Fails with `DatabaseError::NotFound` for unknown ids.
    async fn update_user(&self, id: Uuid, email: &str, hashed_password: &str) -> Result<User>;

    /// Fails with `DatabaseError::NotFound` for unknown ids.
    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> Result<User>;
}

#[async_trait]
pub trait ChirpRepository: Send + Sync {
    async fn create_chirp(&self, chirp: &Chirp) -> Result<Chirp>;

    /// Oldest first, optionally restricted to one author.
    async fn list_chirps(&self, author_id: Option<Uuid>) -> Result<Vec<Chirp>>;

    async fn get_chirp(&self, id: Uuid) -> Result<Option<Chirp>>;

    /// Fails with `DatabaseError::NotFound` for unknown ids.
    async fn delete_chirp(&self, id: Uuid) -> Result<()>;
}
