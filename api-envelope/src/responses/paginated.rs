//! Paginated list envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::filter::FilterOptions;

fn is_zero(value: &i64) -> bool {
    *value == 0
}

/// One page of results plus the filter that selected it
///
/// Zero counters are omitted from the JSON body.
///
/// # Example
///
/// ```rust
/// use api_envelope::filter::FilterOptions;
/// use api_envelope::responses::PaginatedResponse;
///
/// let filter = FilterOptions::new().with_page(1).with_limit(2).validated(100);
/// let response = PaginatedResponse::new(vec!["a", "b"], 3, &filter);
///
/// assert_eq!(response.total_page, 2);
/// assert_eq!(response.page_size, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// Items matching the filter across all pages
    #[serde(default, skip_serializing_if = "is_zero")]
    pub total_data: i64,
    /// `ceil(total_data / page_size)`
    #[serde(default, skip_serializing_if = "is_zero")]
    pub total_page: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub current_page: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub page_size: i64,
    pub data: T,
    pub filters: FilterOptions,
}

impl<T> PaginatedResponse<T> {
    /// Build the envelope from a page of data and the overall match count
    ///
    /// A limit below 1 counts as 1, and a negative total as 0.
    pub fn new(data: T, total_data: i64, filter: &FilterOptions) -> Self {
        Self {
            total_data,
            total_page: total_pages(total_data, filter.limit),
            current_page: filter.page,
            page_size: filter.limit,
            data,
            filters: filter.clone(),
        }
    }

    /// Whether another page follows this one
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_page
    }
}

/// `ceil(total / limit)` in integer arithmetic
pub fn total_pages(total: i64, limit: i64) -> i64 {
    let total = u64::try_from(total).unwrap_or(0);
    let limit = u64::try_from(limit).unwrap_or(0).max(1);
    i64::try_from(total.div_ceil(limit)).unwrap_or(i64::MAX)
}

impl<T: Serialize> IntoResponse for PaginatedResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
