//! Application state for shared services

use std::sync::Arc;

use crate::domain::user::UserRepository;
use crate::domain::{DomainError, User, UserSortKey};
use crate::infrastructure::user::{CreateUserRequest, UpdateUserRequest, UserService};

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
}

impl AppState {
    pub fn new(user_service: Arc<dyn UserServiceTrait>) -> Self {
        Self { user_service }
    }

    /// Build state around a user repository
    pub fn with_repository<R: UserRepository + 'static>(repository: Arc<R>) -> Self {
        Self::new(Arc::new(UserService::new(repository)))
    }
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError>;
    async fn get(&self, username: &str) -> Result<User, DomainError>;
    async fn list(&self, sort_key: UserSortKey) -> Result<Vec<User>, DomainError>;
    async fn update(
        &self,
        username: &str,
        request: UpdateUserRequest,
    ) -> Result<User, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

#[async_trait::async_trait]
impl<R: UserRepository + 'static> UserServiceTrait for UserService<R> {
    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        UserService::create(self, request).await
    }

    async fn get(&self, username: &str) -> Result<User, DomainError> {
        UserService::get(self, username).await
    }

    async fn list(&self, sort_key: UserSortKey) -> Result<Vec<User>, DomainError> {
        UserService::list(self, sort_key).await
    }

    async fn update(
        &self,
        username: &str,
        request: UpdateUserRequest,
    ) -> Result<User, DomainError> {
        UserService::update(self, username, request).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        UserService::count(self).await
    }
}
