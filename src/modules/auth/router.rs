use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::controller::{login_user, logout_user, me, register_user};
use crate::middleware::auth::require_user;
use crate::state::AppState;

pub fn init_auth_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/logout", post(logout_user))
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(state, require_user));

    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .merge(protected)
}
