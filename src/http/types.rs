use axum::extract::{rejection::JsonRejection, FromRequest};
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::domain::error::EngineError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody { pub message: String }

/// Error returned by every handler; maps engine failures to status codes.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new<M: Into<String>>(status: StatusCode, message: M) -> Self { Self { status, message: message.into() } }

    pub fn bad_request<M: Into<String>>(message: M) -> Self { Self::new(StatusCode::BAD_REQUEST, message) }

    pub fn not_found() -> Self { Self::new(StatusCode::NOT_FOUND, "Not found") }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        let status = match err {
            EngineError::Validation(_) => StatusCode::BAD_REQUEST,
            EngineError::NotFound(_) => StatusCode::NOT_FOUND,
            EngineError::DuplicateDate(_) => StatusCode::CONFLICT,
        };
        Self::new(status, err.to_string())
    }
}

/// `Json` extractor whose body errors come back as a 400 `ErrorBody`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self { Self::bad_request(rejection.body_text()) }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<EngineError>() {
            Ok(engine) => engine.into(),
            Err(other) => {
                tracing::error!(error = %other, "request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, format!("{}", other))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response { (self.status, axum::Json(ErrorBody { message: self.message })).into_response() }
}
