//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → liveness check (public)
//! - `/auth` → login (public)
//! - `/users`, `/roles` → admin-only management
//! - `/shifts`, `/leaves`, `/lateness` → authenticated staff endpoints;
//!   archival triggers and archive reads inside `/leaves` and `/lateness`
//!   additionally require the admin flag.

use crate::auth::guards::{allow_admin, allow_authenticated};
use crate::routes::{
    auth::auth_routes, health::health_routes, lateness::lateness_routes, leaves::leaves_routes,
    roles::roles_routes, shifts::shifts_routes, users::users_routes,
};
use axum::{Router, middleware::from_fn};
use util::state::AppState;

pub mod auth;
pub mod health;
pub mod lateness;
pub mod leaves;
pub mod roles;
pub mod shifts;
pub mod users;

/// Builds the application router for all HTTP endpoints.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes())
        .nest("/users", users_routes().route_layer(from_fn(allow_admin)))
        .nest("/roles", roles_routes().route_layer(from_fn(allow_admin)))
        .nest(
            "/shifts",
            shifts_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/leaves",
            leaves_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/lateness",
            lateness_routes().route_layer(from_fn(allow_authenticated)),
        )
        .with_state(app_state)
}
