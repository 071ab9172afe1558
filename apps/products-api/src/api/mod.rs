//! API routes module

pub mod health;
pub mod products;

use axum::Router;
use domain_products::handlers::BASE_PATH;

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest(BASE_PATH, products::router(state))
        .merge(health::router(state.clone()))
}
