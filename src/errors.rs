use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Classes of failure a handler can report. Each maps to exactly one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The addressed record or object does not exist.
    NotFound,
    /// Upload rejected because of its file extension.
    InvalidFileType,
    /// The object store failed while listing or writing images.
    ObjectStore,
    /// The request body could not be parsed into the route's input shape.
    InvalidInput,
    /// The table store (or an object existence check) failed.
    StoreFailure,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            // Image validation and object-store failures keep the 404 clients already handle.
            ErrorKind::NotFound | ErrorKind::InvalidFileType | ErrorKind::ObjectStore => {
                StatusCode::NOT_FOUND
            }
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::StoreFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A lightweight error that carries only the client-facing message.
/// Underlying causes are logged where they occur and never serialized.
#[derive(Debug)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            message: msg.into(),
        }
    }

    /// Shortcut for a 404 on a missing record or object.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }

    /// Shortcut for a table store failure (500).
    pub fn store(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreFailure, msg)
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, msg)
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));

        (self.status(), body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("rejected request body: {}", rejection.body_text());
        AppError::invalid_input("Invalid request body")
    }
}
