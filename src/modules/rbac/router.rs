use axum::{
    Router,
    routing::{get, put},
};

use super::controller::{
    create_role, delete_role, get_role_permissions, list_permissions, list_roles,
    set_role_permissions, update_role,
};
use crate::state::AppState;

pub fn init_rbac_router() -> Router<AppState> {
    Router::new()
        .route("/roles", get(list_roles).post(create_role))
        .route("/roles/{code}", put(update_role).delete(delete_role))
        .route(
            "/roles/{code}/permissions",
            get(get_role_permissions).put(set_role_permissions),
        )
        .route("/permissions", get(list_permissions))
}
