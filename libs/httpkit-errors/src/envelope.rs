//! Wire model shared by every JSON error response (pure data, no I/O)

use serde::{Deserialize, Serialize};

use crate::classify::ClassifiedError;

/// One entry of an [`ErrorEnvelope`].
///
/// Classified errors and field violations share this shape so clients parse
/// a single schema whatever went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorItem {
    /// Public error type name.
    pub error: String,
    /// Machine-readable code; omitted when zero.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub error_code: i64,
    /// Offending field for validation errors; omitted when empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub field: String,
    /// Human-readable description; omitted when empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires &T signature
fn is_zero(code: &i64) -> bool {
    *code == 0
}

/// The body of every JSON error response: `{"errors": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub errors: Vec<ErrorItem>,
}

impl ErrorEnvelope {
    #[must_use]
    pub fn single(item: impl Into<ErrorItem>) -> Self {
        Self {
            errors: vec![item.into()],
        }
    }

    #[must_use]
    pub fn from_violations(violations: &[FieldViolation]) -> Self {
        Self {
            errors: violations.iter().map(ErrorItem::from).collect(),
        }
    }
}

/// A single failed validator invocation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field {field} is invalid: {description}")]
pub struct FieldViolation {
    /// Serialized field name, or the declared identifier when not renamed.
    pub field: String,
    pub description: String,
    pub error_name: String,
    pub error_code: i64,
}

impl From<ClassifiedError> for ErrorItem {
    fn from(c: ClassifiedError) -> Self {
        Self {
            error: c.type_name,
            error_code: c.code,
            field: String::new(),
            description: c.description,
        }
    }
}

impl From<&FieldViolation> for ErrorItem {
    fn from(v: &FieldViolation) -> Self {
        Self {
            error: v.error_name.clone(),
            error_code: v.error_code,
            field: v.field.clone(),
            description: v.description.clone(),
        }
    }
}

impl From<FieldViolation> for ErrorItem {
    fn from(v: FieldViolation) -> Self {
        Self {
            error: v.error_name,
            error_code: v.error_code,
            field: v.field,
            description: v.description,
        }
    }
}
