//! User management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{DomainError, User, UserSortKey, UserValidationError};
use crate::infrastructure::user::{CreateUserRequest, UpdateUserRequest};

pub const USER_CREATED: &str = "New user created";
pub const USER_UPDATED: &str = "User updated";

const REQUIRED_FIELDS: [&str; 4] = ["username", "first_name", "last_name", "email"];

/// Query parameters for listing users
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    pub sort_by: Option<String>,
}

/// User as rendered by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            username: user.username().to_string(),
            first_name: user.first_name().map(str::to_string),
            last_name: user.last_name().map(str::to_string),
            email: user.email().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserResponse>,
}

/// Create echoes the submitted object as-is
#[derive(Debug, Serialize, Deserialize)]
pub struct UserCreatedResponse {
    pub message: String,
    pub user: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserUpdatedResponse {
    pub message: String,
    pub user: String,
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Result<(StatusCode, Json<UserCreatedResponse>), ApiError> {
    let body = json_object(body).ok_or_else(|| ApiError::from(DomainError::MissingData))?;
    let request = create_request_from_body(&body)?;

    debug!(username = %request.username, "Creating user");

    state
        .user_service
        .create(request)
        .await
        .map_err(ApiError::from)?;

    Ok((
        StatusCode::CREATED,
        Json(UserCreatedResponse {
            message: USER_CREATED.to_string(),
            user: body,
        }),
    ))
}

/// GET /users/{username}
pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(username = %username, "Getting user");

    let user = state
        .user_service
        .get(&username)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(UserResponse::from(&user)))
}

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<ListUsersResponse>, ApiError> {
    let sort_key = match query.sort_by.as_deref() {
        Some(value) => value.parse::<UserSortKey>().map_err(ApiError::from)?,
        None => UserSortKey::default(),
    };

    debug!(sort_by = %sort_key, "Listing users");

    let users = state
        .user_service
        .list(sort_key)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ListUsersResponse {
        users: users.iter().map(UserResponse::from).collect(),
    }))
}

/// PUT /users/{username}
pub async fn update_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    body: Option<Json<Value>>,
) -> Result<Json<UserUpdatedResponse>, ApiError> {
    debug!(username = %username, "Updating user");

    // Unknown users are reported ahead of an empty body.
    state
        .user_service
        .get(&username)
        .await
        .map_err(ApiError::from)?;

    let body = json_object(body)
        .filter(|body| !body.is_empty())
        .ok_or_else(|| ApiError::from(DomainError::MissingData))?;

    let request = update_request_from_body(&body)?;

    state
        .user_service
        .update(&username, request)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(UserUpdatedResponse {
        message: USER_UPDATED.to_string(),
        user: username,
    }))
}

/// The body as a JSON object. `null`, arrays and scalars count as no data.
fn json_object(body: Option<Json<Value>>) -> Option<Map<String, Value>> {
    match body.map(Json::into_inner) {
        Some(Value::Object(body)) => Some(body),
        _ => None,
    }
}

fn create_request_from_body(body: &Map<String, Value>) -> Result<CreateUserRequest, ApiError> {
    let complete = REQUIRED_FIELDS
        .iter()
        .all(|field| body.get(*field).is_some_and(|value| !value.is_null()));

    if !complete {
        return Err(ApiError::from(DomainError::MissingData));
    }

    Ok(CreateUserRequest {
        username: required_string(body, "username")?,
        first_name: Some(required_string(body, "first_name")?),
        last_name: Some(required_string(body, "last_name")?),
        email: required_string(body, "email")?,
    })
}

fn update_request_from_body(body: &Map<String, Value>) -> Result<UpdateUserRequest, ApiError> {
    let email = match body.get("email") {
        None => None,
        Some(Value::String(email)) => Some(email.clone()),
        Some(_) => {
            return Err(ApiError::from(DomainError::from(
                UserValidationError::InvalidEmail,
            )));
        }
    };

    Ok(UpdateUserRequest {
        first_name: nullable_string(body, "first_name")?,
        last_name: nullable_string(body, "last_name")?,
        email,
    })
}

fn required_string(body: &Map<String, Value>, field: &str) -> Result<String, ApiError> {
    match nullable_string(body, field)? {
        Some(Some(value)) => Ok(value),
        _ => Err(ApiError::from(DomainError::MissingData)),
    }
}

/// `None` when absent, `Some(None)` when null
fn nullable_string(
    body: &Map<String, Value>,
    field: &str,
) -> Result<Option<Option<String>>, ApiError> {
    match body.get(field) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::String(value)) => Ok(Some(Some(value.clone()))),
        Some(_) => Err(ApiError::bad_request(format!(
            "Field '{}' must be a string",
            field
        ))),
    }
}
