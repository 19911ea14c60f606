use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum AppError {
    /// Bad or missing caller input.
    #[error("{0}")]
    Validation(String),
    /// The upstream API rejected or failed the call.
    #[error("{0}")]
    RemoteService(String),
    #[error("The file '{}' was not found.", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to parse JSON. Details: {0}")]
    Parse(String),
    #[error("Unexpected error: {0}")]
    Unexpected(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl AppError {
    pub fn question_required() -> Self {
        Self::Validation("Question is required".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Maps an I/O failure on `path`, keeping "not found" distinct.
    pub fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.into()),
            _ => Self::Unexpected(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Self::Unexpected(err.to_string())
        } else {
            Self::Parse(err.to_string())
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::RemoteService(format!("request timed out: {err}"))
        } else {
            Self::RemoteService(err.to_string())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
