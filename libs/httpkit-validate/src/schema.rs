//! Declarative per-type validation schema.
//!
//! A schema is produced once per type by `#[derive(Validate)]` and cached by
//! the [`SchemaRegistry`](crate::SchemaRegistry); traversal never looks at
//! the type again.

use std::any::Any;

/// Reserved tag entry that recurses into the field's value.
pub const STRUCT_MARKER: &str = "struct";

/// A struct whose fields can be validated by the engine.
///
/// Usually derived:
///
/// ```ignore
/// #[derive(Validate, Deserialize)]
/// struct Signup {
///     #[validate("required,email")]
///     #[serde(rename = "emailAddress")]
///     email: String,
///     #[validate("struct")]
///     address: Option<Address>,
/// }
/// ```
pub trait Validate: Any {
    /// Field layout of `Self`; only fields carrying a validation tag appear.
    fn schema() -> StructSchema
    where
        Self: Sized;

    /// Value of the field at `index` in [`StructSchema::fields`], or `None`
    /// when that field cannot be read.
    fn field_value(&self, index: usize) -> Option<&dyn Any>;
}

/// Split a tag on `,` into validator names, keeping order and empty entries.
/// An empty tag names no validators.
#[must_use]
pub fn parse_tag(tag: &'static str) -> Vec<&'static str> {
    if tag.is_empty() {
        return Vec::new();
    }
    tag.split(',').collect()
}

/// One tagged field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    index: usize,
    ident: &'static str,
    serialized_name: Option<&'static str>,
    validators: Vec<&'static str>,
}

impl FieldSchema {
    #[must_use]
    pub fn new(
        index: usize,
        ident: &'static str,
        serialized_name: Option<&'static str>,
        tag: &'static str,
    ) -> Self {
        Self {
            index,
            ident,
            serialized_name: serialized_name.filter(|n| !n.is_empty()),
            validators: parse_tag(tag),
        }
    }

    /// Position passed to [`Validate::field_value`].
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Declared Rust identifier.
    #[must_use]
    pub fn ident(&self) -> &'static str {
        self.ident
    }

    /// Serialized name when renamed, the declared identifier otherwise.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        self.serialized_name.unwrap_or(self.ident)
    }

    #[must_use]
    pub fn validators(&self) -> &[&'static str] {
        &self.validators
    }

    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.validators.contains(&STRUCT_MARKER)
    }
}

/// Ordered tagged fields of one struct type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructSchema {
    type_name: &'static str,
    fields: Vec<FieldSchema>,
}

impl StructSchema {
    #[must_use]
    pub fn new(type_name: &'static str, fields: Vec<FieldSchema>) -> Self {
        Self { type_name, fields }
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }
}
