//! # KXL Core
//!
//! Core types, errors, and utilities shared by every KXL crate.
//!
//! - [`errors`]: Business error taxonomy with HTTP response conversion
//! - [`response`]: Success and paginated response envelopes
//! - [`pagination`]: Page/page-size query parameters
//! - [`permissions`]: Admin permission code constants
//! - [`password`]: Password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use kxl_core::{ApiResponse, AppError, Paged};
//!
//! async fn handler() -> Result<ApiResponse<Paged<String>>, AppError> {
//!     let items = vec!["a".to_string()];
//!     Ok(ApiResponse::success(Paged::new(items, 1, 1, 10)))
//! }
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod permissions;
pub mod response;

pub use errors::{AppError, ErrorDetail};
pub use pagination::{Page, PageParams};
pub use password::{hash_password, verify_password};
pub use response::{ApiResponse, Paged};
