use figment::Figment;
use httpkit_errors::catalog::{VALIDATION_ERROR_CODE, VALIDATION_ERROR_TYPE};
use httpkit_errors::config::{ConfigError, load_section};
use serde::Deserialize;

/// Default bound on `"struct"` recursion.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Validation engine settings (`validation` section).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    /// `errorCode` of every violation, including unknown-validator ones.
    pub error_code: i64,
    /// `error` name of every violation, including unknown-validator ones.
    pub error_name: String,
    /// Maximum nesting of `"struct"` recursion below the validated value.
    pub max_depth: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            error_code: VALIDATION_ERROR_CODE,
            error_name: VALIDATION_ERROR_TYPE.to_owned(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ValidationConfig {
    pub const SECTION: &'static str = "validation";

    /// Load the `validation` section, falling back to defaults when absent.
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` if the section exists but cannot be deserialized.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        load_section(figment, Self::SECTION)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use figment::providers::{Format, Yaml};

    #[test]
    fn defaults_match_catalog() {
        let cfg = ValidationConfig::from_figment(&Figment::new()).unwrap();
        assert_eq!(cfg.error_code, 8000);
        assert_eq!(cfg.error_name, "validation");
        assert_eq!(cfg.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn section_overrides() {
        let figment = Figment::from(Yaml::string(
            "validation:\n  error_code: 4220\n  error_name: invalid_field\n",
        ));
        let cfg = ValidationConfig::from_figment(&figment).unwrap();
        assert_eq!(cfg.error_code, 4220);
        assert_eq!(cfg.error_name, "invalid_field");
        assert_eq!(cfg.max_depth, DEFAULT_MAX_DEPTH);
    }
}
