//! # api-envelope
//!
//! Consistent HTTP API envelopes for axum services.
//!
//! ## Features
//!
//! - **Filters**: multi-valued query parameters parsed into a validated
//!   [`FilterOptions`](filter::FilterOptions), including parameters unknown at
//!   compile time
//! - **Cache keys**: order-independent SHA-256 fingerprints of a filter
//! - **Error envelopes**: failures classified and translated into
//!   `{code, message, errors, request_id}` bodies
//! - **Success envelopes**: paginated lists and single objects
//! - **Configuration**: figment-based, with the `MAX_LIMIT_PAGINATE` override
//!
//! ## Example
//!
//! ```rust,no_run
//! use api_envelope::prelude::*;
//!
//! async fn list_users(Filter(filter): Filter) -> PaginatedResponse<Vec<String>> {
//!     let users = vec!["alice".to_string(), "bob".to_string()];
//!     PaginatedResponse::new(users, 2, &filter)
//! }
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let app: Router = Router::new()
//!         .route("/users", get(list_users))
//!         .layer(request_id_propagation_layer())
//!         .layer(request_id_layer())
//!         .with_state(config.pagination.clone());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod errors;
pub mod filter;
pub mod middleware;
pub mod observability;
pub mod responses;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, PaginationConfig, ServiceConfig};

    pub use crate::error::{Error, FieldConversionError, Result};

    pub use crate::errors::{
        classify, handle_error, DatabaseError, DatabaseErrorKind, ErrorEntry, ErrorKind,
        FieldViolation, HttpError, StandardErrorResponse, TypeConversionError, ValidationErrors,
    };

    pub use crate::filter::{
        generate_cache_key, parse_parameters, DynamicValue, Filter, FilterOptions, QueryParams,
        SortDirection,
    };

    pub use crate::middleware::{
        request_id_from_headers, request_id_layer, request_id_propagation_layer,
        REQUEST_ID_HEADER,
    };

    pub use crate::observability::init_tracing;

    pub use crate::responses::{PaginatedResponse, SingleDataResponse};

    pub use axum::{
        extract::{Query, State},
        http::{HeaderMap, StatusCode},
        response::{IntoResponse, Json, Response},
        routing::get,
        Router,
    };

    pub use serde::{Deserialize, Serialize};

    pub use tracing::{debug, error, info, warn};
}
