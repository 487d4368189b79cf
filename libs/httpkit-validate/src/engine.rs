//! Schema-driven validation traversal

use std::any::Any;
use std::sync::Arc;

use httpkit_errors::FieldViolation;

use crate::config::ValidationConfig;
use crate::registry::SchemaRegistry;
use crate::schema::{FieldSchema, STRUCT_MARKER, Validate};
use crate::table::ValidatorTable;

/// Walks registered structs and applies the validators named in their tags.
///
/// The engine is total: unknown validator names become violations, values
/// that are not registered structs yield no violations, and nothing panics
/// on odd input. Violations come back in discovery order: fields in
/// declaration order, validators in tag order, nested results spliced in
/// where the `"struct"` entry sits.
#[derive(Debug)]
pub struct ValidationEngine {
    table: ValidatorTable,
    config: Arc<ValidationConfig>,
    registry: SchemaRegistry,
}

impl ValidationEngine {
    /// Engine knowing every `#[derive(Validate)]` type in the inventory.
    #[must_use]
    pub fn new(table: ValidatorTable, config: Arc<ValidationConfig>) -> Self {
        Self::with_registry(table, config, SchemaRegistry::from_inventory())
    }

    #[must_use]
    pub fn with_registry(
        table: ValidatorTable,
        config: Arc<ValidationConfig>,
        registry: SchemaRegistry,
    ) -> Self {
        Self {
            table,
            config,
            registry,
        }
    }

    /// Register a type the inventory cannot see (generic structs).
    pub fn register<T: Validate>(&self) -> &Self {
        self.registry.register::<T>();
        self
    }

    #[must_use]
    pub fn table(&self) -> &ValidatorTable {
        &self.table
    }

    #[must_use]
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate any value. Values that are not registered structs (after
    /// one level of `Option`/`Box`/`Arc`) produce no violations.
    #[must_use]
    pub fn validate(&self, value: &dyn Any) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        self.walk(value, 0, &mut violations);
        violations
    }

    /// Validate a statically known struct, registering its schema on first use.
    #[must_use]
    pub fn validate_struct<T: Validate>(&self, value: &T) -> Vec<FieldViolation> {
        if !self.registry.contains::<T>() {
            self.registry.register::<T>();
        }
        self.validate(value)
    }

    fn walk(&self, value: &dyn Any, depth: usize, out: &mut Vec<FieldViolation>) {
        let Some((schema, target)) = self.registry.resolve(value) else {
            return;
        };

        for field in schema.fields() {
            if field.validators().is_empty() {
                continue;
            }
            let Some(field_value) = target.field_value(field.index()) else {
                continue;
            };

            for &name in field.validators() {
                if name == STRUCT_MARKER {
                    self.descend(schema.type_name(), field, field_value, depth, out);
                    continue;
                }

                let Some(validator) = self.table.get(name) else {
                    tracing::warn!(
                        type_name = schema.type_name(),
                        field = field.ident(),
                        validator = name,
                        "undefined validator in validation tag"
                    );
                    out.push(
                        self.violation(field.ident(), format!("undefined validator: {name:?}")),
                    );
                    continue;
                };

                if let Err(err) = validator(field_value) {
                    out.push(self.violation(field.display_name(), err.to_string()));
                }
            }
        }
    }

    fn descend(
        &self,
        type_name: &'static str,
        field: &FieldSchema,
        field_value: &dyn Any,
        depth: usize,
        out: &mut Vec<FieldViolation>,
    ) {
        if depth >= self.config.max_depth {
            tracing::warn!(
                type_name,
                field = field.ident(),
                max_depth = self.config.max_depth,
                "nested validation depth exceeded"
            );
            out.push(self.violation(
                field.display_name(),
                format!(
                    "maximum validation depth {} exceeded",
                    self.config.max_depth
                ),
            ));
            return;
        }
        self.walk(field_value, depth + 1, out);
    }

    fn violation(&self, field: &str, description: String) -> FieldViolation {
        FieldViolation {
            field: field.to_owned(),
            description,
            error_name: self.config.error_name.clone(),
            error_code: self.config.error_code,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::schema::{FieldSchema, StructSchema};
    use crate::table::BoxError;
    use tracing_test::traced_test;

    /// Hand-written implementation; the derive is exercised in tests/.
    struct Node {
        label: String,
        next: Option<Box<Node>>,
    }

    impl Validate for Node {
        fn schema() -> StructSchema {
            StructSchema::new(
                "Node",
                vec![
                    FieldSchema::new(0, "label", Some("nodeLabel"), "required"),
                    FieldSchema::new(1, "next", None, "struct"),
                ],
            )
        }

        fn field_value(&self, index: usize) -> Option<&dyn Any> {
            match index {
                0 => Some(&self.label as &dyn Any),
                1 => Some(&self.next as &dyn Any),
                _ => None,
            }
        }
    }

    fn chain(len: usize) -> Node {
        let mut node = Node {
            label: String::new(),
            next: None,
        };
        for _ in 1..len {
            node = Node {
                label: String::new(),
                next: Some(Box::new(node)),
            };
        }
        node
    }

    fn engine(max_depth: usize) -> ValidationEngine {
        let table =
            ValidatorTable::new().with_typed("required", |s: &String| -> Result<(), BoxError> {
                if s.is_empty() {
                    Err("is required".into())
                } else {
                    Ok(())
                }
            });
        let config = ValidationConfig {
            max_depth,
            ..ValidationConfig::default()
        };
        let engine =
            ValidationEngine::with_registry(table, Arc::new(config), SchemaRegistry::new());
        engine.register::<Node>();
        engine
    }

    #[test]
    fn recursion_through_box_indirection() {
        let violations = engine(8).validate(&chain(3));
        assert_eq!(violations.len(), 3);
        assert!(violations.iter().all(|v| v.field == "nodeLabel"));
    }

    #[test]
    fn depth_guard_stops_descent() {
        let violations = engine(2).validate(&chain(5));
        // depth 0, 1, 2 validated, then the guard fires on the third "next"
        assert_eq!(violations.len(), 4);
        let last = violations.last().unwrap();
        assert_eq!(last.field, "next");
        assert_eq!(last.description, "maximum validation depth 2 exceeded");
        assert_eq!(last.error_code, 8000);
    }

    #[test]
    fn non_struct_values_are_a_no_op() {
        let e = engine(8);
        assert!(e.validate(&"plain text").is_empty());
        assert!(e.validate(&7_i64).is_empty());
        let none: Option<Node> = None;
        assert!(e.validate(&none).is_empty());
    }

    #[test]
    #[traced_test]
    fn unknown_validator_reports_raw_ident_and_logs() {
        let engine = ValidationEngine::with_registry(
            ValidatorTable::new(),
            Arc::new(ValidationConfig::default()),
            SchemaRegistry::new(),
        );
        engine.register::<Node>();

        let violations = engine.validate(&chain(1));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "label");
        assert_eq!(violations[0].description, "undefined validator: \"required\"");
        assert!(logs_contain("undefined validator in validation tag"));
    }
}
