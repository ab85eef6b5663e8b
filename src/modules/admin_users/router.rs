use axum::{
    Router,
    routing::{get, patch},
};

use super::controller::{get_user, list_users, update_user_status};
use crate::state::AppState;

pub fn init_admin_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/{id}", get(get_user))
        .route("/{id}/status", patch(update_user_status))
}
