//! API route definitions.

use axum::{Router, middleware};

use crate::AppState;
use crate::middleware::{auth_middleware, require_admin, require_current_password};

pub mod auth;
pub mod budgets;
pub mod dashboard;
pub mod health;
pub mod transactions;
pub mod users;

/// Creates the API router; the auth middleware needs the state up front.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Admin-only routes. Layers run bottom-up, so authentication comes first.
    let admin_routes = Router::new()
        .merge(users::routes())
        .merge(budgets::admin_routes())
        .merge(transactions::admin_routes())
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn(require_current_password))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Routes for any signed-in user with a current password
    let member_routes = Router::new()
        .merge(budgets::routes())
        .merge(dashboard::routes())
        .layer(middleware::from_fn(require_current_password))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Reachable with an expired password
    let password_routes = auth::protected_routes().layer(middleware::from_fn_with_state(
        state,
        auth_middleware,
    ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(password_routes)
        .merge(member_routes)
        .merge(admin_routes)
}
