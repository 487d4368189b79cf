//! Tag-driven struct validation for `HTTPKit`
//!
//! Fields opt in with `#[validate("name1,name2")]`; each name is looked up
//! in a caller-supplied [`ValidatorTable`], and the reserved name `"struct"`
//! recurses into the field. Failures come back as
//! [`FieldViolation`](httpkit_errors::FieldViolation)s ready for
//! `ResponseEncoder::write_validation_errors`.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod engine;
pub mod registry;
pub mod schema;
pub mod table;

pub use config::ValidationConfig;
pub use engine::ValidationEngine;
pub use registry::{SchemaRegistration, SchemaRegistry};
pub use schema::{FieldSchema, STRUCT_MARKER, StructSchema, Validate, parse_tag};
pub use table::{BoxError, ValidatorError, ValidatorFn, ValidatorTable};

#[cfg(feature = "derive")]
pub use httpkit_macros::Validate;

#[doc(hidden)]
pub use inventory;
