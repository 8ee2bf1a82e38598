//! API routes module

use axum::{middleware, Router};
use axum_helpers::optional_jwt_auth_middleware;

pub mod health;
pub mod products;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
///
/// The JWT middleware attaches an identity to every request that carries a
/// valid token; handlers and the service decide per operation whether one is
/// required.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new()
        .nest("/products", products::router(state))
        .layer(middleware::from_fn_with_state(
            state.jwt_auth.clone(),
            optional_jwt_auth_middleware,
        ))
}

/// Creates a router with the /ready endpoint that performs actual health checks.
///
/// This router has state applied and can be merged with the stateless app router
/// from `create_router`. The /ready endpoint checks the database connection.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
