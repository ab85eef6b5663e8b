use axum::{Router, middleware, routing::post};

use super::controller::change_password;
use crate::middleware::auth::require_user;
use crate::state::AppState;

pub fn init_users_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/change-password", post(change_password))
        .route_layer(middleware::from_fn_with_state(state, require_user))
}
