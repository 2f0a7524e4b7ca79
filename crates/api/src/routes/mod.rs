pub mod health;
pub mod operations;
pub mod positions;
pub mod sandbox;

use axum::Router;

use crate::state::AppState;

/// Build the complete API router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(positions::router())
        .merge(operations::router())
        .merge(sandbox::router())
        .with_state(state)
}
