//! HTTP feature modules.
//!
//! Each module follows the same layout: `controller.rs` holds the handlers,
//! `service.rs` the business rules, `router.rs` the route table and, where
//! needed, `model.rs` response shapes local to the module.

pub mod admin_auth;
pub mod admin_users;
pub mod admins;
pub mod auth;
pub mod health;
pub mod rbac;
pub mod users;
