//! Single-object envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Default message for successful responses
pub const SUCCESS_MESSAGE: &str = "Success";

/// `{code, message, data}` wrapper for a single object
///
/// # Example
///
/// ```rust
/// use api_envelope::responses::SingleDataResponse;
/// use axum::http::StatusCode;
///
/// let response = SingleDataResponse::new("payload", "", None);
/// assert_eq!(response.code, 200);
/// assert_eq!(response.message, "Success");
///
/// let created = SingleDataResponse::new(42, "User created", Some(StatusCode::CREATED));
/// assert_eq!(created.code, 201);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleDataResponse<T> {
    pub code: u16,
    pub message: String,
    pub data: T,
}

impl<T> SingleDataResponse<T> {
    /// Wrap `data`; an empty message becomes `Success` and no status means 200
    pub fn new(data: T, message: impl Into<String>, status: Option<StatusCode>) -> Self {
        let message = message.into();
        Self {
            code: status.unwrap_or(StatusCode::OK).as_u16(),
            message: if message.is_empty() {
                SUCCESS_MESSAGE.to_string()
            } else {
                message
            },
            data,
        }
    }

    /// 200 with the default message
    pub fn ok(data: T) -> Self {
        Self::new(data, SUCCESS_MESSAGE, None)
    }

    /// HTTP status for `code`, 500 if `code` is not a valid status
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl<T: Serialize> IntoResponse for SingleDataResponse<T> {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}
