use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// `message` goes to the client, `cause` only to the log.
    #[error("{message}")]
    Internal {
        message: &'static str,
        cause: String,
    },
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    /// Maps a domain error onto the HTTP boundary, using `message` when the
    /// store failed.
    pub fn from_domain(err: DomainError, message: &'static str) -> Self {
        match err {
            DomainError::InvalidInput(msg) | DomainError::Conflict(msg) => AppError::Validation(msg),
            DomainError::Internal(cause) => AppError::Internal { message, cause },
        }
    }
}

/// Shorthand for `map_err` at handler call sites.
pub fn failed(message: &'static str) -> impl FnOnce(DomainError) -> AppError {
    move |err| AppError::from_domain(err, message)
}

impl From<BlockingError> for AppError {
    fn from(e: BlockingError) -> Self {
        AppError::Internal {
            message: "Internal server error",
            cause: e.to_string(),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal { message, cause } = self {
            log::error!("{}: {}", message, cause);
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "error": self.to_string()
        }))
    }
}
