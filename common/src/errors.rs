use crate::repository::GatewayError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::{debug, error, warn};
use serde::Serialize;
use std::io;
use thiserror::Error;
use utoipa::ToSchema;

/// HTTP error body: `{error, details?}`
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// One failed rule on one form field.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), code: code.into(), message: message.into() }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Resource not found")]
    NotFound,

    /// Request-level rejection (file count, file size, malformed multipart).
    #[error("{0}")]
    Validation(String),

    #[error("Validation failed")]
    InvalidFields(Vec<FieldError>),

    #[error("Unauthorized")]
    Unauthorized(String),

    #[error("Insufficient permissions")]
    Forbidden,

    /// A remote write failed part-way through a multi-step sequence.
    #[error("{step}: {source}")]
    UpstreamWrite {
        step: String,
        client_id: Option<String>,
        #[source]
        source: GatewayError,
    },

    #[error("Upstream error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Internal server error")]
    Internal(String),
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::InvalidFields(field_errors(&e))
    }
}

/// Flattens validator output into a stable, field-sorted list.
pub fn field_errors(errors: &validator::ValidationErrors) -> Vec<FieldError> {
    let mut details: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |err| {
                let message = err.message.as_ref().map(|m| m.to_string()).unwrap_or_else(|| err.code.to_string());
                FieldError::new(field.clone(), err.code.to_string(), message)
            })
        })
        .collect();
    details.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
    details
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::InvalidFields(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = match self {
            AppError::InvalidFields(details) => {
                debug!("rejecting request with invalid fields: {:?}", details);
                ErrorResponse { error: self.to_string(), details: Some(details.clone()) }
            }
            AppError::NotFound | AppError::Validation(_) => {
                debug!("rejecting request: {}", self);
                ErrorResponse { error: self.to_string(), details: None }
            }
            AppError::Forbidden => {
                warn!("request refused: insufficient permissions");
                ErrorResponse { error: self.to_string(), details: None }
            }
            AppError::Unauthorized(reason) => {
                debug!("rejecting unauthenticated request: {}", reason);
                ErrorResponse { error: self.to_string(), details: None }
            }
            AppError::UpstreamWrite { step, client_id, source } => {
                error!("upstream write failed at [{}] client_id={:?}: {:?}", step, client_id, source);
                ErrorResponse { error: self.to_string(), details: None }
            }
            e => {
                error!("{:?}", e);
                ErrorResponse { error: "Internal server error".to_string(), details: None }
            }
        };
        HttpResponse::build(status).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let resp = err.error_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn invalid_fields_carry_details() {
        let err = AppError::InvalidFields(vec![FieldError::new("email", "email", "Invalid email address")]);
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["details"][0]["field"], "email");
    }

    #[tokio::test]
    async fn upstream_write_names_the_step() {
        let err = AppError::UpstreamWrite {
            step: "Failed to link services".to_string(),
            client_id: Some("c-1".to_string()),
            source: GatewayError::Rejected { status: 409, message: "duplicate key".to_string() },
        };
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let msg = body["error"].as_str().unwrap();
        assert!(msg.starts_with("Failed to link services"), "{msg}");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn internal_errors_are_generic() {
        let (status, body) = body_json(AppError::Internal("secret detail".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn auth_statuses() {
        let (status, body) = body_json(AppError::Unauthorized("no token".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized");
        let (status, body) = body_json(AppError::Forbidden).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Insufficient permissions");
    }

    /// Collects every log line emitted by this test binary.
    struct CaptureLog;
    static CAPTURED: std::sync::Mutex<Vec<String>> = std::sync::Mutex::new(Vec::new());

    impl log::Log for CaptureLog {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }
        fn log(&self, record: &log::Record) {
            if let Ok(mut lines) = CAPTURED.lock() {
                lines.push(format!("{} {}", record.level(), record.args()));
            }
        }
        fn flush(&self) {}
    }

    fn logged(fragment: &str) -> bool {
        CAPTURED.lock().unwrap().iter().any(|line| line.contains(fragment))
    }

    #[tokio::test]
    async fn client_errors_are_logged_server_side() {
        static LOGGER: CaptureLog = CaptureLog;
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Debug);

        body_json(AppError::Forbidden).await;
        body_json(AppError::Validation("At most 5 files are allowed".into())).await;
        body_json(AppError::InvalidFields(vec![FieldError::new("email", "email", "Invalid email address")])).await;
        assert!(logged("WARN request refused: insufficient permissions"));
        assert!(logged("DEBUG rejecting request: At most 5 files are allowed"));
        assert!(logged("DEBUG rejecting request with invalid fields"));
    }
}
