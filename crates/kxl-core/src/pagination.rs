//! Page-based pagination parameters.
//!
//! List endpoints accept `page` (1-indexed, default 1) and `page_size`
//! (default 10, must be within 1..=200). Non-numeric or empty values fall
//! back to the defaults; a non-positive `page` is treated as the first page.
//! A `page` whose row offset does not fit in an `i64` is a validation error.
//!
//! # Example
//!
//! ```ignore
//! async fn list_users(
//!     Query(params): Query<PageParams>,
//! ) -> Result<ApiResponse<Paged<User>>, AppError> {
//!     let page = params.resolve()?;
//!     let (rows, total) = fetch_users(page.limit(), page.offset()).await?;
//!     Ok(ApiResponse::success(Paged::new(rows, total, page.page, page.page_size)))
//! }
//! ```

use serde::{Deserialize, Deserializer};
use utoipa::IntoParams;

use crate::errors::AppError;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 200;

/// Deserializes an optional query string value into an `i64`.
///
/// Empty and unparsable strings become `None` so the default applies.
fn deserialize_lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.and_then(|s| s.trim().parse::<i64>().ok()))
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub page: Option<i64>,
    /// Items per page (1-200, default: 10)
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub page_size: Option<i64>,
}

/// Validated paging window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub page_size: i64,
}

impl PageParams {
    /// Applies defaults and validates `page_size` and the resulting offset.
    pub fn resolve(&self) -> Result<Page, AppError> {
        let page = self.page.filter(|p| *p > 0).unwrap_or(1);
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::validation(
                "validation error: page_size must be between 1 and 200",
            ));
        }
        if (page - 1).checked_mul(page_size).is_none() {
            return Err(AppError::validation("validation error: page out of range"));
        }
        Ok(Page { page, page_size })
    }
}

impl Page {
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.page_size
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}
