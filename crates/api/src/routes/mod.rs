//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod attendance;
pub mod face;
pub mod health;
pub mod qr;
pub mod sessions;
pub mod windows;


/// Creates the API router, wiring authentication around every route except health.
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(sessions::routes())
        .merge(windows::routes())
        .merge(qr::routes())
        .merge(face::routes())
        .merge(attendance::routes())
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new().merge(health::routes()).merge(protected_routes)
}
