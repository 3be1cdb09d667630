//! Domain layer - Core business logic and entities

pub mod error;
pub mod user;

pub use error::DomainError;
pub use user::{
    validate_email, validate_names, validate_username, EmailAddress, User, UserChanges,
    UserRepository, UserSortKey, UserValidationError, Username,
};
