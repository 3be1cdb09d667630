//! User entity and related types

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_email, validate_username, UserValidationError};
use crate::domain::DomainError;

/// Username - ASCII alphanumeric, acts as the primary key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Create a new Username after validation
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        let username = username.into();
        validate_username(&username)?;
        Ok(Self(username))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Syntactically valid email address
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new EmailAddress after validation
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        validate_email(&email)?;
        Ok(Self(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique, immutable key
    username: Username,
    /// Optional given name, never validated
    first_name: Option<String>,
    /// Optional family name, never validated
    last_name: Option<String>,
    /// Contact address
    email: EmailAddress,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(
        username: Username,
        first_name: Option<String>,
        last_name: Option<String>,
        email: EmailAddress,
    ) -> Self {
        let now = Utc::now();

        Self {
            username,
            first_name,
            last_name,
            email,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a user from persisted state, keeping its timestamps
    pub fn restore(
        username: Username,
        first_name: Option<String>,
        last_name: Option<String>,
        email: EmailAddress,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            username,
            first_name,
            last_name,
            email,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    pub fn set_first_name(&mut self, first_name: Option<String>) {
        self.first_name = first_name;
        self.touch();
    }

    pub fn set_last_name(&mut self, last_name: Option<String>) {
        self.last_name = last_name;
        self.touch();
    }

    pub fn set_email(&mut self, email: EmailAddress) {
        self.email = email;
        self.touch();
    }

    /// Apply a validated set of changes; username is never touched
    pub fn apply(&mut self, changes: UserChanges) {
        let UserChanges {
            first_name,
            last_name,
            email,
        } = changes;

        if let Some(first_name) = first_name {
            self.first_name = first_name;
        }

        if let Some(last_name) = last_name {
            self.last_name = last_name;
        }

        if let Some(email) = email {
            self.email = email;
        }

        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Validated partial update of a user.
///
/// The outer `Option` marks whether a field is present; for the name fields
/// the inner `Option` is the new value, so `Some(None)` clears the name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub first_name: Option<Option<String>>,
    pub last_name: Option<Option<String>>,
    pub email: Option<EmailAddress>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }
}

/// Field a user listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserSortKey {
    #[default]
    Username,
    FirstName,
    LastName,
    Email,
}

impl UserSortKey {
    pub const ALL: [UserSortKey; 4] = [
        UserSortKey::Username,
        UserSortKey::FirstName,
        UserSortKey::LastName,
        UserSortKey::Email,
    ];

    /// Field name as it appears on the wire and in the users table
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
        }
    }

    /// Ascending order by this key, ties broken by username.
    /// Absent names order before present ones.
    pub fn compare(&self, a: &User, b: &User) -> Ordering {
        let primary = match self {
            Self::Username => Ordering::Equal,
            Self::FirstName => a.first_name().cmp(&b.first_name()),
            Self::LastName => a.last_name().cmp(&b.last_name()),
            Self::Email => a.email().cmp(b.email()),
        };

        primary.then_with(|| a.username().cmp(b.username()))
    }

    /// Sort users in place
    pub fn sort(&self, users: &mut [User]) {
        users.sort_by(|a, b| self.compare(a, b));
    }
}

impl FromStr for UserSortKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| DomainError::invalid_sort_key(s))
    }
}

impl std::fmt::Display for UserSortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
