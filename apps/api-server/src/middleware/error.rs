//! Error handling - RFC 7807 compliant responses.

use actix_multipart::form::MultipartFormConfig;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};

use inkwell_core::error::DomainError;
use inkwell_core::ports::MAX_IMAGE_BYTES;
use inkwell_shared::ErrorResponse;

use crate::observability::RequestId;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized(detail) => ErrorResponse::unauthorized(detail),
            AppError::Forbidden => ErrorResponse::forbidden(),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        let error = match RequestId::current() {
            Some(id) => error.with_request_id(id),
            None => error,
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

/// Duplicate keys are reported as 400, the same class as other bad input.
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Conflict(msg) => AppError::BadRequest(msg),
            DomainError::Unauthenticated(msg) => AppError::Unauthorized(msg),
            DomainError::Forbidden => AppError::Forbidden,
            DomainError::NotFound { entity, .. } => AppError::NotFound(format!("{entity} not found")),
            DomainError::Storage(e) => AppError::Internal(format!("storage: {e}")),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Body, path and query extractor failures render as 400 problem details.
pub fn extractor_error(err: impl std::fmt::Display, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "Rejected malformed request");
    AppError::BadRequest(err.to_string()).into()
}

/// Extractor configuration shared by the server and the tests.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, req| extractor_error(err, req)))
        .app_data(web::QueryConfig::default().error_handler(|err, req| extractor_error(err, req)))
        .app_data(web::PathConfig::default().error_handler(|err, req| extractor_error(err, req)))
        .app_data(
            MultipartFormConfig::default()
                .total_limit(MULTIPART_LIMIT)
                .memory_limit(MULTIPART_LIMIT)
                .error_handler(|err, req| extractor_error(err, req)),
        );
}

/// Enough for one full-size image plus the text fields.
const MULTIPART_LIMIT: usize = MAX_IMAGE_BYTES + 1024 * 1024;
