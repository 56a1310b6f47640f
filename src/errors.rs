use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures of the notes service, one variant per HTTP status it can end in.
#[derive(Error, Debug)]
pub enum NoteError {
    #[error("Content is required")]
    Validation,

    #[error("Note not found")]
    NotFound,

    /// Unexpected file or parse fault. The detail is logged, never sent.
    #[error("storage failure: {0}")]
    Storage(String),
}

pub type NoteResult<T> = Result<T, NoteError>;

impl NoteError {
    pub fn status(&self) -> StatusCode {
        match self {
            NoteError::Validation => StatusCode::BAD_REQUEST,
            NoteError::NotFound => StatusCode::NOT_FOUND,
            NoteError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short message safe to show to a user.
    pub fn public_message(&self) -> &'static str {
        match self {
            NoteError::Validation => "Content is required",
            NoteError::NotFound => "Note not found",
            NoteError::Storage(_) => "Internal server error",
        }
    }
}

impl From<std::io::Error> for NoteError {
    fn from(value: std::io::Error) -> Self {
        Self::Storage(value.to_string())
    }
}

impl From<serde_json::Error> for NoteError {
    fn from(value: serde_json::Error) -> Self {
        Self::Storage(value.to_string())
    }
}

impl IntoResponse for NoteError {
    fn into_response(self) -> Response {
        if let NoteError::Storage(detail) = &self {
            tracing::error!("Storage failure while handling request: {detail}");
        }

        (self.status(), Json(json!({ "error": self.public_message() }))).into_response()
    }
}

/// Problems locating or reading `config.json`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
