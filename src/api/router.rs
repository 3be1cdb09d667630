use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::health;
use super::middleware::logging_middleware;
use super::state::AppState;
use super::users;

pub const WELCOME: &str =
    "Welcome to the User Management Application. Navigate to /users to manage users.";

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // User management
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{username}",
            get(users::get_user).put(users::update_user),
        )
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}

async fn welcome() -> &'static str {
    WELCOME
}
