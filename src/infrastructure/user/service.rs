//! User service: validation in front of the user repository

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::user::{
    validate_names, EmailAddress, User, UserChanges, UserRepository, UserSortKey, Username,
    UserValidationError, USER_NOT_FOUND,
};
use crate::domain::DomainError;

/// Request for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
}

/// Request for updating a user; absent fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub first_name: Option<Option<String>>,
    pub last_name: Option<Option<String>>,
    pub email: Option<String>,
}

/// User service. Every write runs the username and email rules before the
/// repository sees the record.
#[derive(Debug)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    /// Create a new user service
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        let username = Username::new(request.username)?;
        let email = EmailAddress::new(request.email)?;
        validate_names(request.first_name.as_deref(), request.last_name.as_deref())?;

        let user = User::new(username, request.first_name, request.last_name, email);
        let user = self.repository.create(user).await?;

        info!(username = %user.username(), "User created");

        Ok(user)
    }

    /// Get a user by username
    pub async fn get(&self, username: &str) -> Result<User, DomainError> {
        self.repository
            .get(username)
            .await?
            .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND))
    }

    /// List all users ordered by the given key
    pub async fn list(&self, sort_key: UserSortKey) -> Result<Vec<User>, DomainError> {
        self.repository.list(sort_key).await
    }

    /// Update a user's mutable fields.
    ///
    /// A missing user is reported ahead of any validation failure, and a field
    /// failing validation discards the whole update. The existence lookup only
    /// happens on the failure path; otherwise the repository reports NotFound.
    pub async fn update(
        &self,
        username: &str,
        request: UpdateUserRequest,
    ) -> Result<User, DomainError> {
        let changes = match validate_changes(request) {
            Ok(changes) => changes,
            Err(err) => {
                if !self.repository.exists(username).await? {
                    return Err(DomainError::not_found(USER_NOT_FOUND));
                }
                return Err(err.into());
            }
        };

        if changes.is_empty() {
            debug!(username = %username, "Update carries no user fields");
        }

        let user = self.repository.update(username, changes).await?;

        info!(username = %user.username(), "User updated");

        Ok(user)
    }

    /// Count users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}

fn validate_changes(request: UpdateUserRequest) -> Result<UserChanges, UserValidationError> {
    validate_names(
        request.first_name.as_ref().and_then(Option::as_deref),
        request.last_name.as_ref().and_then(Option::as_deref),
    )?;

    Ok(UserChanges {
        first_name: request.first_name,
        last_name: request.last_name,
        email: request.email.map(EmailAddress::new).transpose()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::MockUserRepository;
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    fn create_service() -> UserService<InMemoryUserRepository> {
        UserService::new(Arc::new(InMemoryUserRepository::new()))
    }

    fn make_request(username: &str, first: &str, last: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            first_name: Some(first.to_string()),
            last_name: Some(last.to_string()),
            email: email.to_string(),
        }
    }

    fn alice() -> CreateUserRequest {
        make_request("alice1", "Alice", "Smith", "alice1@example.com")
    }

    fn assert_validation(err: DomainError, expected_field: &str, expected_message: &str) {
        match err {
            DomainError::Validation { field, message } => {
                assert_eq!(field, expected_field);
                assert_eq!(message, expected_message);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_user() {
        let service = create_service();

        let user = service.create(alice()).await.unwrap();
        assert_eq!(user.username().as_str(), "alice1");
        assert_eq!(user.first_name(), Some("Alice"));
        assert_eq!(user.last_name(), Some("Smith"));
        assert_eq!(user.email().as_str(), "alice1@example.com");
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let service = create_service();
        service.create(alice()).await.unwrap();

        let user = service.get("alice1").await.unwrap();
        assert_eq!(user.first_name(), Some("Alice"));
        assert_eq!(user.last_name(), Some("Smith"));
        assert_eq!(user.email().as_str(), "alice1@example.com");
    }

    #[tokio::test]
    async fn test_create_user_invalid_username() {
        let service = create_service();

        for username in ["non_alphanumeric@username", "has space", "dash-ed", ""] {
            let request = make_request(username, "Chuck", "Norris", "chuck@norris.com");
            let err = service.create(request).await.unwrap_err();
            assert_validation(err, "username", "Username must be alphanumeric");
        }

        assert_eq!(service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_user_invalid_email() {
        let service = create_service();

        for email in ["chuck@norris", "chuck", "@norris.com", "chuck@"] {
            let request = make_request("cnorris1940", "Chuck", "Norris", email);
            let err = service.create(request).await.unwrap_err();
            assert_validation(err, "email", "Invalid email address");
        }

        assert_eq!(service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_username_rule_checked_before_email_rule() {
        let service = create_service();

        let request = make_request("bad name", "Chuck", "Norris", "bad");
        let err = service.create(request).await.unwrap_err();
        assert_validation(err, "username", "Username must be alphanumeric");
    }

    #[tokio::test]
    async fn test_create_duplicate_username() {
        let service = create_service();

        service.create(alice()).await.unwrap();

        let err = service
            .create(make_request("alice1", "Other", "Person", "other@example.com"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, DomainError::DuplicateKey { ref message } if message == "Username already exists")
        );

        assert_eq!(service.count().await.unwrap(), 1);
        let stored = service.get("alice1").await.unwrap();
        assert_eq!(stored.first_name(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let service = create_service();

        let err = service.get("nouser").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { ref message } if message == "User not found"));
    }

    #[tokio::test]
    async fn test_list_default_sorted_by_username() {
        let service = create_service();

        for name in ["charlie", "alice", "bob"] {
            service
                .create(make_request(name, "X", "Y", &format!("{}@example.com", name)))
                .await
                .unwrap();
        }

        let users = service.list(UserSortKey::default()).await.unwrap();
        let names: Vec<&str> = users.iter().map(|u| u.username().as_str()).collect();
        assert_eq!(names, vec!["alice", "bob", "charlie"]);
    }

    #[tokio::test]
    async fn test_list_sorted_by_last_name() {
        let service = create_service();

        service
            .create(make_request("aaa", "A", "Zulu", "a@example.com"))
            .await
            .unwrap();
        service
            .create(make_request("bbb", "B", "Alpha", "b@example.com"))
            .await
            .unwrap();

        let users = service.list(UserSortKey::LastName).await.unwrap();
        let names: Vec<&str> = users.iter().map(|u| u.username().as_str()).collect();
        assert_eq!(names, vec!["bbb", "aaa"]);
    }

    #[tokio::test]
    async fn test_update_email_only() {
        let service = create_service();
        service.create(alice()).await.unwrap();

        let request = UpdateUserRequest {
            email: Some("alice@new.com".to_string()),
            ..Default::default()
        };
        let user = service.update("alice1", request).await.unwrap();

        assert_eq!(user.email().as_str(), "alice@new.com");
        assert_eq!(user.first_name(), Some("Alice"));
        assert_eq!(user.last_name(), Some("Smith"));
    }

    #[tokio::test]
    async fn test_update_all_fields() {
        let service = create_service();
        service.create(alice()).await.unwrap();

        let request = UpdateUserRequest {
            first_name: Some(Some("Alicia".to_string())),
            last_name: Some(None),
            email: Some("alicia@example.org".to_string()),
        };
        service.update("alice1", request).await.unwrap();

        let user = service.get("alice1").await.unwrap();
        assert_eq!(user.first_name(), Some("Alicia"));
        assert!(user.last_name().is_none());
        assert_eq!(user.email().as_str(), "alicia@example.org");
    }

    #[tokio::test]
    async fn test_update_invalid_email_applies_nothing() {
        let service = create_service();
        service.create(alice()).await.unwrap();

        let request = UpdateUserRequest {
            first_name: Some(Some("Mallory".to_string())),
            last_name: Some(Some("Evil".to_string())),
            email: Some("bad".to_string()),
        };
        let err = service.update("alice1", request).await.unwrap_err();
        assert_validation(err, "email", "Invalid email address");

        let user = service.get("alice1").await.unwrap();
        assert_eq!(user.first_name(), Some("Alice"));
        assert_eq!(user.last_name(), Some("Smith"));
        assert_eq!(user.email().as_str(), "alice1@example.com");
    }

    #[tokio::test]
    async fn test_update_missing_user_reported_before_validation() {
        let service = create_service();

        let request = UpdateUserRequest {
            email: Some("bad".to_string()),
            ..Default::default()
        };
        let err = service.update("nouser", request).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_repository_failure_propagates() {
        let repository = Arc::new(MockUserRepository::new());
        let service = UserService::new(Arc::clone(&repository));

        repository.set_should_fail(true).await;

        let err = service.create(alice()).await.unwrap_err();
        assert!(matches!(err, DomainError::Storage { .. }));

        let err = service.list(UserSortKey::Email).await.unwrap_err();
        assert!(err.is_infrastructure());
    }

    #[tokio::test]
    async fn test_create_rejects_long_names() {
        let service = create_service();

        let long_name = "x".repeat(81);
        let err = service
            .create(make_request("alice1", &long_name, "Smith", "alice1@example.com"))
            .await
            .unwrap_err();
        assert_validation(err, "first_name", "First name must be at most 80 characters");

        let err = service
            .create(make_request(&"a".repeat(200), "Alice", "Smith", "alice1@example.com"))
            .await
            .unwrap_err();
        assert_validation(err, "username", "Username must be alphanumeric");

        assert_eq!(service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_rejects_long_last_name() {
        let service = create_service();
        service.create(alice()).await.unwrap();

        let request = UpdateUserRequest {
            last_name: Some(Some("y".repeat(81))),
            email: Some("alice@new.com".to_string()),
            ..Default::default()
        };
        let err = service.update("alice1", request).await.unwrap_err();
        assert_validation(err, "last_name", "Last name must be at most 80 characters");

        let user = service.get("alice1").await.unwrap();
        assert_eq!(user.email().as_str(), "alice1@example.com");
    }

    #[tokio::test]
    async fn test_valid_update_skips_existence_lookup() {
        let repository = Arc::new(MockUserRepository::new());
        let service = UserService::new(Arc::clone(&repository));
        service.create(alice()).await.unwrap();

        let request = UpdateUserRequest {
            email: Some("alice@new.com".to_string()),
            ..Default::default()
        };
        service.update("alice1", request).await.unwrap();
        assert_eq!(repository.lookups(), 0);

        let err = service
            .update("nouser", UpdateUserRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { ref message } if message == "User not found"));
        assert_eq!(repository.lookups(), 0);
    }
}
