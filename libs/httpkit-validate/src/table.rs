use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Error type returned by validator functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A named validator. Receives the field value as `&dyn Any`; an `Err`
/// becomes a violation whose description is the error's `Display` text.
pub type ValidatorFn = Arc<dyn Fn(&dyn Any) -> Result<(), BoxError> + Send + Sync>;

/// Failures reported by validators registered with
/// [`ValidatorTable::insert_typed`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidatorError {
    #[error("validator '{validator}' expects a value of type {expected}")]
    TypeMismatch {
        validator: String,
        expected: &'static str,
    },
}

/// Caller-supplied mapping from tag name to validator.
///
/// The engine owns no validators of its own; `"struct"` is reserved for
/// recursion and is never looked up here.
#[derive(Clone, Default)]
pub struct ValidatorTable {
    validators: HashMap<String, ValidatorFn>,
}

impl ValidatorTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) an untyped validator.
    pub fn insert<F>(&mut self, name: impl Into<String>, validator: F) -> &mut Self
    where
        F: Fn(&dyn Any) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.validators.insert(name.into(), Arc::new(validator));
        self
    }

    /// Register a validator for fields of type `T`.
    ///
    /// A field of any other type yields a [`ValidatorError::TypeMismatch`]
    /// violation instead of calling `validator`.
    pub fn insert_typed<T, F>(&mut self, name: impl Into<String>, validator: F) -> &mut Self
    where
        T: Any,
        F: Fn(&T) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        let name = name.into();
        let validator_name = name.clone();
        self.insert(name, move |value: &dyn Any| match value.downcast_ref::<T>() {
            Some(typed) => validator(typed),
            None => Err(Box::new(ValidatorError::TypeMismatch {
                validator: validator_name.clone(),
                expected: std::any::type_name::<T>(),
            })),
        })
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with<F>(mut self, name: impl Into<String>, validator: F) -> Self
    where
        F: Fn(&dyn Any) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.insert(name, validator);
        self
    }

    /// Builder-style [`insert_typed`](Self::insert_typed).
    #[must_use]
    pub fn with_typed<T, F>(mut self, name: impl Into<String>, validator: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.insert_typed(name, validator);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ValidatorFn> {
        self.validators.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl std::fmt::Debug for ValidatorTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ValidatorTable")
            .field("validators", &names)
            .finish()
    }
}
