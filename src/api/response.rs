//! API response helpers
//!
//! Every response, successful or not, is wrapped in the same envelope:
//!
//! ```json
//! { "code": 200, "data": { ... } }
//! { "code": 404, "message": "Note does not exist" }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use serde::Serialize;

use crate::notes;

/// The envelope around every response
#[derive(Serialize)]
struct Envelope<D>
where
    D: Serialize,
{
    /// Copy of the HTTP status code
    code: u16,

    /// Only present for errors
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,

    /// Only present for successes
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<D>,
}

/// Hold data for a successful API interaction
pub struct Success<V>
where
    V: Serialize,
{
    status_code: StatusCode,
    data: V,
}

impl<V> Success<V>
where
    V: Serialize,
{
    pub fn ok(data: V) -> Self {
        Self {
            status_code: StatusCode::OK,
            data,
        }
    }
}

impl<V> IntoResponse for Success<V>
where
    V: Serialize,
{
    fn into_response(self) -> Response {
        (
            self.status_code,
            Json(Envelope {
                code: self.status_code.as_u16(),
                message: None,
                data: Some(self.data),
            }),
        )
            .into_response()
    }
}

/// Hold data for a failed API interaction
#[derive(Debug)]
pub struct Error {
    status_code: StatusCode,
    message: String,
}

impl Error {
    fn new<M>(status_code: StatusCode, message: M) -> Self
    where
        M: ToString,
    {
        Self {
            status_code,
            message: message.to_string(),
        }
    }

    pub fn bad_request<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn forbidden<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn method_not_allowed<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, message)
    }

    pub fn conflict<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal_server_error<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Append more details to the message
    pub fn with_description<M>(self, description: M) -> Self
    where
        M: ToString,
    {
        Self {
            status_code: self.status_code,
            message: format!("{}: {}", self.message, description.to_string()),
        }
    }
}

impl From<notes::Error> for Error {
    fn from(error: notes::Error) -> Self {
        match error {
            notes::Error::Validation(message) => Self::bad_request(message),
            notes::Error::NotFound(message) => Self::not_found(message),
            notes::Error::Conflict(message) => Self::conflict(message),
            notes::Error::Internal(error) => Self::internal_server_error(error),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (
            self.status_code,
            Json(Envelope::<()> {
                code: self.status_code.as_u16(),
                message: Some(self.message),
                data: None,
            }),
        )
            .into_response()
    }
}
