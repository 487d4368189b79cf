//! Optional capabilities an error type may expose to the classifier.
//!
//! Rust cannot ask an arbitrary `&dyn Error` whether it implements some trait,
//! so error types opt in by registering a set of typed downcasts. A registration is a
//! `const` value: it is either submitted to the process-wide [`inventory`]
//! (usually through [`register_error!`](crate::register_error)) or handed to
//! an [`ErrorClassifier`](crate::ErrorClassifier) explicitly.
//!
//! ```ignore
//! #[derive(Debug, thiserror::Error)]
//! #[error("user {0} not found")]
//! pub struct UserNotFound(pub String);
//!
//! impl HttpStatusEquivalent for UserNotFound {
//!     fn status_code(&self) -> StatusCode {
//!         StatusCode::NOT_FOUND
//!     }
//! }
//!
//! httpkit_errors::register_error!(UserNotFound: http_status);
//! ```

use std::error::Error;
use std::marker::PhantomData;

use http::StatusCode;

/// An error that supplies its own public name.
///
/// An empty name counts as "no name" and classification falls through to
/// the next rule.
pub trait Named {
    fn name(&self) -> &str;
}

/// An error that maps onto a standard HTTP status.
pub trait HttpStatusEquivalent {
    fn status_code(&self) -> StatusCode;
}

type NamedCast = for<'a> fn(&'a (dyn Error + 'static)) -> Option<&'a dyn Named>;
type StatusCast = for<'a> fn(&'a (dyn Error + 'static)) -> Option<&'a dyn HttpStatusEquivalent>;

/// Type-erased capability downcasts for one concrete error type.
#[derive(Clone, Copy)]
pub struct ErrorRegistration {
    type_name: fn() -> &'static str,
    matches: fn(&(dyn Error + 'static)) -> bool,
    named: Option<NamedCast>,
    http_status: Option<StatusCast>,
}

inventory::collect!(ErrorRegistration);

fn is_type<E: Error + 'static>(err: &(dyn Error + 'static)) -> bool {
    err.is::<E>()
}

fn as_named<'a, E: Error + Named + 'static>(
    err: &'a (dyn Error + 'static),
) -> Option<&'a dyn Named> {
    err.downcast_ref::<E>().map(|e| e as &dyn Named)
}

fn as_status<'a, E: Error + HttpStatusEquivalent + 'static>(
    err: &'a (dyn Error + 'static),
) -> Option<&'a dyn HttpStatusEquivalent> {
    err.downcast_ref::<E>().map(|e| e as &dyn HttpStatusEquivalent)
}

impl ErrorRegistration {
    /// Start a registration for `E`. Without further capabilities the
    /// registration still contributes `E`'s type name.
    #[must_use]
    pub const fn of<E: Error + 'static>() -> RegistrationBuilder<E> {
        RegistrationBuilder {
            registration: Self {
                type_name: std::any::type_name::<E>,
                matches: is_type::<E>,
                named: None,
                http_status: None,
            },
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn matches(&self, err: &(dyn Error + 'static)) -> bool {
        (self.matches)(err)
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    #[must_use]
    pub fn named<'a>(&self, err: &'a (dyn Error + 'static)) -> Option<&'a dyn Named> {
        self.named.and_then(|cast| cast(err))
    }

    #[must_use]
    pub fn http_status<'a>(
        &self,
        err: &'a (dyn Error + 'static),
    ) -> Option<&'a dyn HttpStatusEquivalent> {
        self.http_status.and_then(|cast| cast(err))
    }
}

impl std::fmt::Debug for ErrorRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorRegistration")
            .field("type_name", &self.type_name())
            .field("named", &self.named.is_some())
            .field("http_status", &self.http_status.is_some())
            .finish_non_exhaustive()
    }
}

/// Typed builder so every capability of a registration targets the same type.
pub struct RegistrationBuilder<E> {
    registration: ErrorRegistration,
    _marker: PhantomData<fn() -> E>,
}

impl<E: Error + 'static> RegistrationBuilder<E> {
    #[must_use]
    pub const fn named(mut self) -> Self
    where
        E: Named,
    {
        self.registration.named = Some(as_named::<E>);
        self
    }

    #[must_use]
    pub const fn http_status(mut self) -> Self
    where
        E: HttpStatusEquivalent,
    {
        self.registration.http_status = Some(as_status::<E>);
        self
    }

    #[must_use]
    pub const fn build(self) -> ErrorRegistration {
        self.registration
    }
}

/// Submit an [`ErrorRegistration`] for a type to the process-wide inventory.
///
/// Capabilities are listed after a colon: `named`, `http_status`.
///
/// ```ignore
/// register_error!(MyError);
/// register_error!(MyError: named);
/// register_error!(MyError: named, http_status);
/// ```
#[macro_export]
macro_rules! register_error {
    ($ty:ty $(: $($cap:ident),+ $(,)?)?) => {
        $crate::inventory::submit! {
            $crate::capability::ErrorRegistration::of::<$ty>()$($(.$cap())+)?.build()
        }
    };
}

/// Ordered set of registrations consulted by the classifier.
#[derive(Debug, Clone, Default)]
pub struct CapabilityRegistry {
    registrations: Vec<ErrorRegistration>,
}

impl CapabilityRegistry {
    /// Registry holding every registration submitted through [`inventory`].
    #[must_use]
    pub fn from_inventory() -> Self {
        Self {
            registrations: inventory::iter::<ErrorRegistration>
                .into_iter()
                .copied()
                .collect(),
        }
    }

    pub fn push(&mut self, registration: ErrorRegistration) {
        self.registrations.push(registration);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// First registration whose concrete type matches `err`.
    #[must_use]
    pub fn find(&self, err: &(dyn Error + 'static)) -> Option<&ErrorRegistration> {
        self.registrations.iter().find(|r| r.matches(err))
    }
}
