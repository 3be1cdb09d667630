//! User domain
//!
//! This module provides the user record, its validation rules, and the
//! repository trait that persistence backends implement.

mod entity;
mod repository;
mod validation;

pub use entity::{EmailAddress, User, UserChanges, UserSortKey, Username};
pub use repository::{UserRepository, USERNAME_ALREADY_EXISTS, USER_NOT_FOUND};
pub use validation::{
    validate_email, validate_names, validate_username, UserValidationError, MAX_EMAIL_LENGTH,
    MAX_NAME_LENGTH, MAX_USERNAME_LENGTH,
};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
