use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use archgraph_core::ArchGraphError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Endpoint family an error was raised from; picks the 500 code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Analyze,
    Validate,
    Export,
    Lookup,
}

impl Operation {
    pub fn failure_code(self) -> &'static str {
        match self {
            Operation::Analyze => "ANALYSIS_ERROR",
            Operation::Validate => "EVALUATION_ERROR",
            Operation::Export => "EXPORT_ERROR",
            Operation::Lookup => "INTERNAL_ERROR",
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    Internal { code: &'static str, message: String },
}

impl ApiError {
    pub fn from_domain(err: ArchGraphError, operation: Operation) -> Self {
        match err {
            ArchGraphError::Validation(message) => ApiError::Validation(message),
            ArchGraphError::NotFound(message) => ApiError::NotFound(message),
            other => ApiError::Internal {
                code: operation.failure_code(),
                message: other.to_string(),
            },
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Internal { code, .. } => *code,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(code = self.code(), error = %self, "Request failed");
        }

        let body = Json(json!({
            "success": false,
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
