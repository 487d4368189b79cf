//! Application error carrying its own type, code and HTTP status

use http::StatusCode;

use crate::capability::Named;
use crate::catalog;

/// An error whose public shape is fully decided by the application.
///
/// The classifier trusts every field of an `AppError`: a non-empty
/// `error_type` becomes the public name, `code` the `errorCode`, and an
/// explicit `status` wins over any other status source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{description}")]
#[must_use]
pub struct AppError {
    pub error_type: String,
    pub code: i64,
    pub description: String,
    pub status: Option<StatusCode>,
}

impl AppError {
    pub fn new(error_type: impl Into<String>, code: i64, description: impl Into<String>) -> Self {
        Self {
            error_type: error_type.into(),
            code,
            description: description.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Malformed JSON request body.
    pub fn json(description: impl Into<String>) -> Self {
        catalog::JSON.as_app_error(description)
    }

    /// Request body declared a content type other than JSON.
    pub fn unsupported_content_type(content_type: &str) -> Self {
        catalog::MARSHALER
            .as_app_error(format!(
                "Content-Type header is {content_type}, not application/json"
            ))
            .with_status(StatusCode::UNSUPPORTED_MEDIA_TYPE)
    }

    /// Handler declared a body type that cannot be decoded for `method`.
    pub fn unsupported_body(method: &http::Method) -> Self {
        catalog::MARSHALER.as_app_error(format!(
            "Untyped body is not suitable for {method} request bodies"
        ))
    }

    /// No route matched. Carries no type so the classifier names it.
    pub fn not_found(description: impl Into<String>) -> Self {
        Self::new("", 0, description).with_status(StatusCode::NOT_FOUND)
    }

    pub fn method_not_allowed(description: &str) -> Self {
        Self::new("", 0, format!("Method not allowed, {description}"))
            .with_status(StatusCode::METHOD_NOT_ALLOWED)
    }
}

impl Named for AppError {
    fn name(&self) -> &str {
        &self.error_type
    }
}
