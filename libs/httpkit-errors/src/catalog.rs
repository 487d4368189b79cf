//! Error catalog: the stable error types and codes emitted by `HTTPKit` itself

use crate::app_error::AppError;
use http::StatusCode;

/// Request body could not be decoded as JSON.
pub const JSON_ERROR_TYPE: &str = "json";
pub const JSON_ERROR_CODE: i64 = 9001;

/// Request body could not be (un)marshaled for the declared content.
pub const MARSHALER_ERROR_TYPE: &str = "marshaler";
pub const MARSHALER_ERROR_CODE: i64 = 9002;

/// Default name/code pair for field violations.
pub const VALIDATION_ERROR_TYPE: &str = "validation";
pub const VALIDATION_ERROR_CODE: i64 = 8000;

/// Static error definition from catalog
#[derive(Debug, Clone, Copy)]
pub struct ErrDef {
    pub status: u16,
    pub error_type: &'static str,
    pub code: i64,
}

pub const JSON: ErrDef = ErrDef {
    status: 400,
    error_type: JSON_ERROR_TYPE,
    code: JSON_ERROR_CODE,
};

pub const MARSHALER: ErrDef = ErrDef {
    status: 500,
    error_type: MARSHALER_ERROR_TYPE,
    code: MARSHALER_ERROR_CODE,
};

pub const VALIDATION: ErrDef = ErrDef {
    status: 400,
    error_type: VALIDATION_ERROR_TYPE,
    code: VALIDATION_ERROR_CODE,
};

impl ErrDef {
    /// Convert this error definition into an [`AppError`] with the given description
    #[inline]
    pub fn as_app_error(&self, description: impl Into<String>) -> AppError {
        // Invalid codes in a definition degrade to INTERNAL_SERVER_ERROR
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        AppError::new(self.error_type, self.code, description).with_status(status)
    }
}
