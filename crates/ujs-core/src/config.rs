//! Runtime identification config and validation.
//!
//! [`RuntimeConfig`] carries the name, version and feature list reported by
//! [`system_info`](crate::info::system_info).

use std::error::Error;
use std::fmt;

/// Identification reported by the native runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Runtime name, e.g. `"UnleashedJS"`.
    pub name: String,
    /// Dotted numeric version, e.g. `"1.0.0"`.
    pub version: String,
    /// Feature labels, listed in order.
    pub features: Vec<String>,
}

impl RuntimeConfig {
    /// Default runtime name.
    pub const DEFAULT_NAME: &'static str = "UnleashedJS";

    /// Default runtime version.
    pub const DEFAULT_VERSION: &'static str = "1.0.0";

    /// Default feature labels.
    pub const DEFAULT_FEATURES: [&'static str; 2] = ["ORC Memory Management", "Native Performance"];

    /// Check that the config can be reported.
    ///
    /// The name must be non-blank, the version must be one or more
    /// dot-separated decimal components, and no feature label may be blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        let version_ok = self
            .version
            .split('.')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()));
        if !version_ok {
            return Err(ConfigError::InvalidVersion {
                version: self.version.clone(),
            });
        }
        if let Some(index) = self.features.iter().position(|f| f.trim().is_empty()) {
            return Err(ConfigError::EmptyFeature { index });
        }
        Ok(())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            name: Self::DEFAULT_NAME.into(),
            version: Self::DEFAULT_VERSION.into(),
            features: Self::DEFAULT_FEATURES.iter().map(|f| f.to_string()).collect(),
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`RuntimeConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The runtime name is empty or whitespace.
    EmptyName,
    /// The version is not dotted decimal.
    InvalidVersion {
        /// The rejected version string.
        version: String,
    },
    /// A feature label is empty or whitespace.
    EmptyFeature {
        /// Position of the blank label.
        index: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "runtime name must not be empty"),
            Self::InvalidVersion { version } => {
                write!(f, "invalid runtime version '{version}'")
            }
            Self::EmptyFeature { index } => {
                write!(f, "feature label {index} must not be empty")
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = RuntimeConfig::default();
        assert_eq!(config.name, "UnleashedJS");
        assert_eq!(config.version, "1.0.0");
        assert_eq!(config.features.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_name_rejected() {
        let config = RuntimeConfig {
            name: "  ".into(),
            ..RuntimeConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyName));
    }

    #[test]
    fn non_numeric_version_rejected() {
        for bad in ["", "1..0", "v1.0", "1.0-beta"] {
            let config = RuntimeConfig {
                version: bad.into(),
                ..RuntimeConfig::default()
            };
            assert_eq!(
                config.validate(),
                Err(ConfigError::InvalidVersion {
                    version: bad.into()
                }),
                "version {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn blank_feature_rejected_with_index() {
        let config = RuntimeConfig {
            features: vec!["ORC".into(), "".into()],
            ..RuntimeConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyFeature { index: 1 })
        );
    }

    #[test]
    fn no_features_is_valid() {
        let config = RuntimeConfig {
            features: Vec::new(),
            ..RuntimeConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
