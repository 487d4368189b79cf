//! Error classification and error response encoding for `HTTPKit`
//!
//! This crate turns arbitrary handler errors into one stable wire shape:
//! - capability probing over unknown error types (`Named`, `HttpStatusEquivalent`)
//! - classification into `{type, code, status, description}` (`ErrorClassifier`)
//! - the `{"errors": [...]}` envelope shared by all JSON error responses
//! - JSON or plaintext encoding into a response sink (`ResponseEncoder`)
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod app_error;
pub mod capability;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod encode;
pub mod envelope;
pub mod sink;

// Re-export commonly used types
pub use app_error::AppError;
pub use capability::{CapabilityRegistry, ErrorRegistration, HttpStatusEquivalent, Named};
pub use classify::{ClassifiedError, ErrorClassifier, snake_case_reason};
pub use config::{ConfigError, ErrorsConfig};
pub use encode::{EncodeError, ResponseEncoder, accepts_json};
pub use envelope::{ErrorEnvelope, ErrorItem, FieldViolation};
pub use sink::{BufferedResponse, ResponseSink};

#[doc(hidden)]
pub use inventory;
