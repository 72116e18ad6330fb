//! API endpoints.

mod admin;
pub mod health;
mod messages;
mod users;
mod voting;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/voting", voting::router())
        .nest("/messages", messages::router())
        .nest("/anniversary-celebration-results", admin::router())
}
