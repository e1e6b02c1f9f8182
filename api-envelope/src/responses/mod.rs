//! Success envelopes
//!
//! - [`PaginatedResponse`]: a page of items with counters and the filter used
//! - [`SingleDataResponse`]: one object with a status code and message

mod paginated;
mod single;

pub use paginated::{total_pages, PaginatedResponse};
pub use single::{SingleDataResponse, SUCCESS_MESSAGE};
