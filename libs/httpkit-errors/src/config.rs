//! Startup configuration shared by the classifier, encoder and validation engine.
//!
//! Configuration is read once, wrapped in an `Arc` and handed to the
//! components at construction time. Nothing mutates it afterwards.
//!
//! Sections are loaded leniently from a [`Figment`]:
//! - a missing section yields `T::default()`
//! - a present but malformed section yields [`ConfigError::Invalid`]

use figment::Figment;
use figment::providers::Env;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Environment variable prefix read by [`env_figment`].
pub const ENV_PREFIX: &str = "HTTPKIT_";

/// Name returned for errors that cannot be named any other way.
pub const DEFAULT_FALLBACK_NAME: &str = "error";

/// Configuration error for typed config operations
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid config for section '{section}': {source}")]
    Invalid {
        section: String,
        #[source]
        source: Box<figment::Error>,
    },
}

/// Error classification settings (`errors` section).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ErrorsConfig {
    /// Name errors that only expose an HTTP status after the status reason
    /// phrase in `snake_case` instead of their type name.
    pub snake_case_status_names: bool,
    /// Name used when an error has no capability and its type is anonymous.
    pub fallback_name: String,
}

impl Default for ErrorsConfig {
    fn default() -> Self {
        Self {
            snake_case_status_names: false,
            fallback_name: DEFAULT_FALLBACK_NAME.to_owned(),
        }
    }
}

impl ErrorsConfig {
    pub const SECTION: &'static str = "errors";

    /// Load the `errors` section, falling back to defaults when absent.
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` if the section exists but cannot be deserialized.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        load_section(figment, Self::SECTION)
    }
}

/// Lenient section loader.
///
/// # Errors
/// Returns `ConfigError::Invalid` if the section exists but cannot be deserialized.
pub fn load_section<T: DeserializeOwned + Default>(
    figment: &Figment,
    section: &str,
) -> Result<T, ConfigError> {
    if !figment.contains(section) {
        return Ok(T::default());
    }
    figment
        .extract_inner(section)
        .map_err(|e| ConfigError::Invalid {
            section: section.to_owned(),
            source: Box::new(e),
        })
}

/// Figment reading `HTTPKIT_<SECTION>__<KEY>` environment variables,
/// e.g. `HTTPKIT_ERRORS__SNAKE_CASE_STATUS_NAMES=true`.
#[must_use]
pub fn env_figment() -> Figment {
    Figment::new().merge(Env::prefixed(ENV_PREFIX).split("__"))
}
