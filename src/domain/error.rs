use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Missing data")]
    MissingData,

    #[error("Validation error on '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Duplicate key: {message}")]
    DuplicateKey { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Invalid sort key: '{value}'")]
    InvalidSortKey { value: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn duplicate_key(message: impl Into<String>) -> Self {
        Self::DuplicateKey {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn invalid_sort_key(value: impl Into<String>) -> Self {
        Self::InvalidSortKey {
            value: value.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Whether the error originates from infrastructure rather than the caller's input
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::Configuration { .. } | Self::Storage { .. })
    }
}
