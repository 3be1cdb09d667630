//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{
    User, UserChanges, UserRepository, UserSortKey, USERNAME_ALREADY_EXISTS, USER_NOT_FOUND,
};
use crate::domain::DomainError;

/// In-memory implementation of UserRepository
///
/// Users are keyed by username, so the uniqueness check and the insert
/// happen under the same write lock.
#[derive(Debug)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<BTreeMap<String, User>>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Create a repository with initial users; later duplicates are dropped
    pub fn with_users(users: Vec<User>) -> Self {
        let mut users_map = BTreeMap::new();

        for user in users {
            users_map
                .entry(user.username().as_str().to_string())
                .or_insert(user);
        }

        Self {
            users: Arc::new(RwLock::new(users_map)),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(username).cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        let username = user.username().as_str().to_string();

        if users.contains_key(&username) {
            return Err(DomainError::duplicate_key(USERNAME_ALREADY_EXISTS));
        }

        users.insert(username, user.clone());

        Ok(user)
    }

    async fn update(&self, username: &str, changes: UserChanges) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        let user = users
            .get_mut(username)
            .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND))?;

        user.apply(changes);

        Ok(user.clone())
    }

    async fn list(&self, sort_key: UserSortKey) -> Result<Vec<User>, DomainError> {
        let users = self.users.read().await;

        let mut result: Vec<User> = users.values().cloned().collect();
        sort_key.sort(&mut result);

        Ok(result)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let users = self.users.read().await;
        Ok(users.len())
    }
}
