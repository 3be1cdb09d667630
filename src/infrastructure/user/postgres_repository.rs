//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::domain::user::{
    EmailAddress, User, UserChanges, UserRepository, UserSortKey, Username,
    USERNAME_ALREADY_EXISTS, USER_NOT_FOUND,
};
use crate::domain::DomainError;

const USER_COLUMNS: &str = "username, first_name, last_name, email, created_at, updated_at";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, username: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (username, first_name, last_name, email, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.username().as_str())
        .bind(user.first_name())
        .bind(user.last_name())
        .bind(user.email().as_str())
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::duplicate_key(USERNAME_ALREADY_EXISTS)
            } else {
                DomainError::storage(format!("Failed to create user: {}", e))
            }
        })?;

        Ok(user)
    }

    async fn update(&self, username: &str, changes: UserChanges) -> Result<User, DomainError> {
        let UserChanges {
            first_name,
            last_name,
            email,
        } = changes;

        let (set_first_name, first_name) = split_change(first_name);
        let (set_last_name, last_name) = split_change(last_name);

        // Single statement so either every present field lands or none does
        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET first_name = CASE WHEN $2 THEN $3 ELSE first_name END,
                last_name = CASE WHEN $4 THEN $5 ELSE last_name END,
                email = COALESCE($6, email),
                updated_at = $7
            WHERE username = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(username)
        .bind(set_first_name)
        .bind(first_name)
        .bind(set_last_name)
        .bind(last_name)
        .bind(email.as_ref().map(EmailAddress::as_str))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update user: {}", e)))?;

        match row {
            Some(row) => row_to_user(&row),
            None => Err(DomainError::not_found(USER_NOT_FOUND)),
        }
    }

    async fn list(&self, sort_key: UserSortKey) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM users ORDER BY {}",
            USER_COLUMNS,
            order_by_clause(sort_key)
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        let mut users = Vec::with_capacity(rows.len());

        for row in rows {
            users.push(row_to_user(&row)?);
        }

        Ok(users)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }
}

/// ORDER BY clause matching the in-memory ordering: byte-wise comparison,
/// absent names first, username as the tie-breaker.
fn order_by_clause(sort_key: UserSortKey) -> String {
    match sort_key {
        UserSortKey::Username => r#"username COLLATE "C" ASC"#.to_string(),
        other => format!(
            r#"{} COLLATE "C" ASC NULLS FIRST, username COLLATE "C" ASC"#,
            other.as_str()
        ),
    }
}

fn split_change(change: Option<Option<String>>) -> (bool, Option<String>) {
    match change {
        Some(value) => (true, value),
        None => (false, None),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let username: String = row.get("username");
    let first_name: Option<String> = row.get("first_name");
    let last_name: Option<String> = row.get("last_name");
    let email: String = row.get("email");
    let created_at: DateTime<Utc> = row.get("created_at");
    let updated_at: DateTime<Utc> = row.get("updated_at");

    let username = Username::new(username)
        .map_err(|e| DomainError::storage(format!("Invalid username in database: {}", e)))?;
    let email = EmailAddress::new(email)
        .map_err(|e| DomainError::storage(format!("Invalid email in database: {}", e)))?;

    Ok(User::restore(
        username, first_name, last_name, email, created_at, updated_at,
    ))
}
