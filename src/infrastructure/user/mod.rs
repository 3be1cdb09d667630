//! User infrastructure module
//!
//! This module provides the in-memory and PostgreSQL user repositories and
//! the user service that validates records before persisting them.

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{CreateUserRequest, UpdateUserRequest, UserService};
