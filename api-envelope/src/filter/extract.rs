//! Axum extractor for list filters

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::Response,
};

use super::options::FilterOptions;
use super::params::{parse_parameters, QueryParams};
use crate::config::PaginationConfig;
use crate::errors::StandardErrorResponse;

/// A validated [`FilterOptions`] parsed from the request query string
///
/// The page size cap comes from the router state through
/// `FromRef<S> for PaginationConfig`. A malformed fixed parameter is rejected
/// with a 400 envelope whose entry names the parameter.
///
/// ```rust,no_run
/// use api_envelope::config::PaginationConfig;
/// use api_envelope::filter::Filter;
/// use axum::{routing::get, Json, Router};
///
/// async fn list(Filter(filter): Filter) -> Json<i64> {
///     Json(filter.limit)
/// }
///
/// let app: Router = Router::new()
///     .route("/items", get(list))
///     .with_state(PaginationConfig::default());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter(pub FilterOptions);

impl<S> FromRequestParts<S> for Filter
where
    PaginationConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = PaginationConfig::from_ref(state);
        let params = QueryParams::from_query(parts.uri.query().unwrap_or_default());

        match parse_parameters(&params, &config) {
            Ok(filter) => Ok(Self(filter)),
            Err(err) => {
                let mut response = StandardErrorResponse::new(StatusCode::BAD_REQUEST);
                response.add_message_error(err.param, err.to_string());
                Err(response.respond(&parts.headers))
            }
        }
    }
}

impl std::ops::Deref for Filter {
    type Target = FilterOptions;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
