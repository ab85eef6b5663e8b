use axum::{Router, routing::get, routing::put};

use super::controller::{create_admin, delete_admin, list_admins, update_admin};
use crate::state::AppState;

pub fn init_admins_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_admins).post(create_admin))
        .route("/{id}", put(update_admin).delete(delete_admin))
}
