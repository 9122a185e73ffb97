pub mod tracing;

use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable '{0}' is required but not set")]
    MissingEnvVar(String),

    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },
}

/// Application environment
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        let app_env = env_or_default("APP_ENV", "development");

        if app_env.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// Trait for configuration that can be loaded from environment variables
pub trait FromEnv: Sized {
    fn from_env() -> Result<Self, ConfigError>;
}

/// Helper to load an environment variable with a default value
pub fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Helper to load an environment variable or return error
pub fn env_required(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Returns the first non-blank value among `keys`.
///
/// The error names the first key, which is the preferred spelling.
pub fn env_first(keys: &[&str]) -> Result<String, ConfigError> {
    keys.iter()
        .filter_map(|key| env::var(key).ok())
        .find(|value| !value.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(keys.first().copied().unwrap_or_default().to_string()))
}

/// Parse an optional environment variable, falling back to `default` when unset.
pub fn env_parse<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_defaults_to_development() {
        temp_env::with_var_unset("APP_ENV", || {
            let env = Environment::from_env();
            assert_eq!(env, Environment::Development);
            assert!(env.is_development());
            assert!(!env.is_production());
        });
    }

    #[test]
    fn test_environment_production_case_insensitive() {
        temp_env::with_var("APP_ENV", Some("PRODUCTION"), || {
            assert_eq!(Environment::from_env(), Environment::Production);
        });
    }

    #[test]
    fn test_env_required_missing() {
        temp_env::with_var_unset("MISSING_REQUIRED", || {
            let err = env_required("MISSING_REQUIRED").unwrap_err();
            assert!(err.to_string().contains("MISSING_REQUIRED"));
            assert!(err.to_string().contains("required"));
        });
    }

    #[test]
    fn test_env_first_prefers_earlier_key() {
        temp_env::with_vars(
            [("PRIMARY_KEY", Some("primary")), ("LEGACY_KEY", Some("legacy"))],
            || {
                assert_eq!(env_first(&["PRIMARY_KEY", "LEGACY_KEY"]).unwrap(), "primary");
            },
        );
    }

    #[test]
    fn test_env_first_falls_back_and_skips_blank() {
        temp_env::with_vars(
            [("PRIMARY_KEY", Some("  ")), ("LEGACY_KEY", Some("legacy"))],
            || {
                assert_eq!(env_first(&["PRIMARY_KEY", "LEGACY_KEY"]).unwrap(), "legacy");
            },
        );
    }

    #[test]
    fn test_env_first_missing_names_preferred_key() {
        temp_env::with_vars_unset(["PRIMARY_KEY", "LEGACY_KEY"], || {
            let err = env_first(&["PRIMARY_KEY", "LEGACY_KEY"]).unwrap_err();
            assert!(err.to_string().contains("PRIMARY_KEY"));
        });
    }

    #[test]
    fn test_env_parse_default_and_value() {
        temp_env::with_var_unset("TIMEOUT_SECS", || {
            assert_eq!(env_parse("TIMEOUT_SECS", 30u64).unwrap(), 30);
        });
        temp_env::with_var("TIMEOUT_SECS", Some(" 12 "), || {
            assert_eq!(env_parse("TIMEOUT_SECS", 30u64).unwrap(), 12);
        });
    }

    #[test]
    fn test_env_parse_invalid() {
        temp_env::with_var("TIMEOUT_SECS", Some("soon"), || {
            let err = env_parse("TIMEOUT_SECS", 30u64).unwrap_err();
            assert!(matches!(err, ConfigError::ParseError { ref key, .. } if key == "TIMEOUT_SECS"));
        });
    }
}
