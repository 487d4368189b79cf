//! Procedural macros for `HTTPKit`
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod validate;

/// Derive `httpkit_validate::Validate` for a struct with named fields.
///
/// Only fields carrying a validation tag take part:
///
/// ```ignore
/// #[derive(Validate, Deserialize)]
/// #[serde(rename_all = "camelCase")]
/// struct Signup {
///     #[validate("required,email")]
///     email_address: String,
///     #[validate = "struct"]
///     address: Option<Address>,
/// }
/// ```
///
/// Violations report the serialized field name, honouring
/// `#[serde(rename = "...")]` and the container's `rename_all`. Non-generic
/// types are registered with the schema inventory automatically; generic
/// ones must be registered through `ValidationEngine::register`.
#[proc_macro_derive(Validate, attributes(validate))]
pub fn derive_validate(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    validate::expand_validate(&input).into()
}
