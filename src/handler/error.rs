use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::extractor::FetchError;
use crate::markdown::{ConvertError, MarkdownError};

/// Body of every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Fetch(FetchError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            Self::Fetch(_) => StatusCode::BAD_GATEWAY,
            Self::Convert(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Fetch(e) => e.kind(),
            Self::Convert(_) => "conversion_error",
        }
    }
}

impl From<MarkdownError> for ApiError {
    fn from(error: MarkdownError) -> Self {
        match error {
            MarkdownError::Fetch(e) => Self::Fetch(e),
            MarkdownError::Convert(e) => Self::Convert(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
