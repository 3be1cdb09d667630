//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{User, UserChanges, UserSortKey};
use crate::domain::DomainError;

/// Message carried by `DomainError::NotFound` for a missing user
pub const USER_NOT_FOUND: &str = "User not found";

/// Message carried by `DomainError::DuplicateKey` for a taken username
pub const USERNAME_ALREADY_EXISTS: &str = "Username already exists";

/// Repository trait for user storage.
///
/// Implementations receive already-validated values and own uniqueness:
/// `create` must fail with `DomainError::DuplicateKey` without writing when
/// the username is taken, and `update` must apply all changes or none.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by exact, case-sensitive username
    async fn get(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Insert a new user
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Apply changes to an existing user and return the stored result
    async fn update(&self, username: &str, changes: UserChanges) -> Result<User, DomainError>;

    /// List all users ordered by the given key
    async fn list(&self, sort_key: UserSortKey) -> Result<Vec<User>, DomainError>;

    /// Count users
    async fn count(&self) -> Result<usize, DomainError>;

    /// Check if a username exists
    async fn exists(&self, username: &str) -> Result<bool, DomainError> {
        Ok(self.get(username).await?.is_some())
    }
}
