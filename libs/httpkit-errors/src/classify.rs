//! Classification of arbitrary errors into a stable public shape

use std::error::Error;
use std::sync::Arc;

use http::StatusCode;

use crate::app_error::AppError;
use crate::capability::{CapabilityRegistry, ErrorRegistration, HttpStatusEquivalent, Named};
use crate::config::ErrorsConfig;

/// Public shape of one error occurrence. Produced per call and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    pub type_name: String,
    pub code: i64,
    pub description: String,
    pub http_status: StatusCode,
}

/// Resolves errors to [`ClassifiedError`] using registered capabilities, falling
/// back to type introspection and finally to configured defaults.
///
/// Never fails: an error with no usable metadata classifies to
/// [`ErrorsConfig::fallback_name`] and `500 Internal Server Error`.
#[derive(Debug, Clone)]
pub struct ErrorClassifier {
    config: Arc<ErrorsConfig>,
    registry: CapabilityRegistry,
}

impl ErrorClassifier {
    /// Classifier seeded with every [`ErrorRegistration`] in the inventory.
    #[must_use]
    pub fn new(config: Arc<ErrorsConfig>) -> Self {
        Self {
            config,
            registry: CapabilityRegistry::from_inventory(),
        }
    }

    /// Classifier that only knows the registrations added explicitly.
    #[must_use]
    pub fn without_inventory(config: Arc<ErrorsConfig>) -> Self {
        Self {
            config,
            registry: CapabilityRegistry::default(),
        }
    }

    #[must_use]
    pub fn with_registration(mut self, registration: ErrorRegistration) -> Self {
        self.registry.push(registration);
        self
    }

    #[must_use]
    pub fn config(&self) -> &ErrorsConfig {
        &self.config
    }

    /// Classify a type-erased error. The runtime type name is only known
    /// when the error's type has been registered.
    #[must_use]
    pub fn classify(&self, err: &(dyn Error + 'static)) -> ClassifiedError {
        self.classify_inner(err, None)
    }

    /// Classify an error whose concrete type is known to the caller; the
    /// static type name is used when no capability supplies a name.
    #[must_use]
    pub fn classify_typed<E: Error + 'static>(&self, err: &E) -> ClassifiedError {
        self.classify_inner(err, Some(std::any::type_name::<E>()))
    }

    /// Public name of `err`, or `fallback` when it has none.
    #[must_use]
    pub fn error_name(&self, err: &(dyn Error + 'static), fallback: &str) -> String {
        let registration = self.registry.find(err);
        self.resolve_name(err, registration, None, fallback)
    }

    /// HTTP status for `err`, defaulting to `500 Internal Server Error`.
    #[must_use]
    pub fn status_code(&self, err: &(dyn Error + 'static)) -> StatusCode {
        resolve_status(err, self.registry.find(err))
    }

    fn classify_inner(
        &self,
        err: &(dyn Error + 'static),
        static_type_name: Option<&'static str>,
    ) -> ClassifiedError {
        let registration = self.registry.find(err);
        let http_status = resolve_status(err, registration);
        let type_name = self.resolve_name(
            err,
            registration,
            static_type_name,
            &self.config.fallback_name,
        );

        let classified = match app_error(err) {
            Some(app) => ClassifiedError {
                type_name,
                code: app.code,
                description: app.description.clone(),
                http_status,
            },
            None => ClassifiedError {
                type_name,
                code: 0,
                description: err.to_string(),
                http_status,
            },
        };

        tracing::trace!(
            error_type = %classified.type_name,
            status = classified.http_status.as_u16(),
            "classified error"
        );
        classified
    }

    fn resolve_name(
        &self,
        err: &(dyn Error + 'static),
        registration: Option<&ErrorRegistration>,
        static_type_name: Option<&'static str>,
        fallback: &str,
    ) -> String {
        let named = app_error(err)
            .map(|app| app as &dyn Named)
            .or_else(|| registration.and_then(|r| r.named(err)));
        if let Some(name) = named.map(Named::name).filter(|n| !n.is_empty()) {
            return name.to_owned();
        }

        if self.config.snake_case_status_names {
            let status = app_error(err).and_then(|app| app.status).or_else(|| {
                registration
                    .and_then(|r| r.http_status(err))
                    .map(HttpStatusEquivalent::status_code)
            });
            if let Some(name) = status.and_then(snake_case_reason) {
                return name;
            }
        }

        static_type_name
            .map(strip_indirection)
            .or_else(|| registration.map(ErrorRegistration::type_name))
            .and_then(public_type_name)
            .map_or_else(|| fallback.to_owned(), ToOwned::to_owned)
    }
}

fn resolve_status(
    err: &(dyn Error + 'static),
    registration: Option<&ErrorRegistration>,
) -> StatusCode {
    if let Some(status) = app_error(err).and_then(|app| app.status) {
        return status;
    }
    registration
        .and_then(|r| r.http_status(err))
        .map_or(StatusCode::INTERNAL_SERVER_ERROR, HttpStatusEquivalent::status_code)
}

/// `err` as an [`AppError`], looking through one `Box` or `Arc`.
fn app_error<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a AppError> {
    err.downcast_ref::<AppError>()
        .or_else(|| err.downcast_ref::<Box<AppError>>().map(Box::as_ref))
        .or_else(|| err.downcast_ref::<Arc<AppError>>().map(Arc::as_ref))
}

/// Type name of the pointee for `&T`, `Box<T>`, `Arc<T>` and `Rc<T>`.
fn strip_indirection(type_name: &str) -> &str {
    if let Some(inner) = type_name.strip_prefix('&') {
        return inner.strip_prefix("mut ").unwrap_or(inner);
    }
    ["alloc::boxed::Box<", "alloc::sync::Arc<", "alloc::rc::Rc<"]
        .iter()
        .find_map(|wrapper| type_name.strip_prefix(wrapper)?.strip_suffix('>'))
        .unwrap_or(type_name)
}

/// Standard reason phrase for `status`, lower-cased with spaces replaced by
/// underscores (`404` → `not_found`). `None` for non-standard codes.
#[must_use]
pub fn snake_case_reason(status: StatusCode) -> Option<String> {
    status
        .canonical_reason()
        .map(|reason| reason.to_lowercase().replace(' ', "_"))
}

/// Returns `type_name` when it names a public, nameable type.
///
/// Mirrors the "exported identifier" convention: the last path segment of
/// the type (ignoring generic arguments) must start with an uppercase letter.
/// Primitives, references, tuples, slices and trait objects are anonymous
/// and yield `None`.
fn public_type_name(type_name: &str) -> Option<&str> {
    let path = type_name.split('<').next().unwrap_or(type_name);
    if path.is_empty() || path.contains(' ') {
        return None;
    }
    let ident = path.rsplit("::").next().unwrap_or(path);
    ident
        .chars()
        .next()
        .filter(char::is_ascii_uppercase)
        .map(|_| type_name)
}
