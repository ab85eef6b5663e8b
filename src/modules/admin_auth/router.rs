use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::controller::{login_admin, logout_admin, me};
use crate::middleware::auth::require_admin;
use crate::state::AppState;

pub fn init_admin_auth_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/logout", post(logout_admin))
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(state, require_admin));

    Router::new().route("/login", post(login_admin)).merge(protected)
}
