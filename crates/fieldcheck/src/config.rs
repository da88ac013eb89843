//! Validator configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {field}: '{value}', expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },
}

/// How the `email` rule treats an empty string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyEmail {
    /// `""` is not a valid email address
    Reject,
    /// `""` means "no value to check" and passes
    Skip,
}

impl FromStr for EmptyEmail {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(EmptyEmail::Reject),
            "skip" => Ok(EmptyEmail::Skip),
            _ => Err(ConfigError::InvalidValue {
                field: "empty_email".to_string(),
                value: s.to_string(),
                expected: "reject or skip".to_string(),
            }),
        }
    }
}

impl std::fmt::Display for EmptyEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmptyEmail::Reject => write!(f, "reject"),
            EmptyEmail::Skip => write!(f, "skip"),
        }
    }
}

/// Settings fixed when a [`Validator`](crate::Validator) is built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Empty-string policy of `email` when validating a native record
    pub record_empty_email: EmptyEmail,
    /// Empty-string policy of `email` when decoding a mapping
    pub decode_empty_email: EmptyEmail,
    /// Merge nested record problems into the parent report under dotted
    /// paths; when false they are discarded
    pub merge_nested: bool,
}

impl ValidatorConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self {
            record_empty_email: EmptyEmail::Reject,
            decode_empty_email: EmptyEmail::Skip,
            merge_nested: true,
        }
    }

    /// Load configuration from environment variables, starting from defaults.
    ///
    /// Reads `FIELDCHECK_RECORD_EMPTY_EMAIL`, `FIELDCHECK_DECODE_EMPTY_EMAIL`
    /// and `FIELDCHECK_MERGE_NESTED`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new();

        if let Ok(value) = env::var("FIELDCHECK_RECORD_EMPTY_EMAIL") {
            config.record_empty_email = value.parse()?;
        }
        if let Ok(value) = env::var("FIELDCHECK_DECODE_EMPTY_EMAIL") {
            config.decode_empty_email = value.parse()?;
        }
        if let Ok(value) = env::var("FIELDCHECK_MERGE_NESTED") {
            config.merge_nested = parse_bool("merge_nested", &value)?;
        }

        Ok(config)
    }

    pub fn record_empty_email(mut self, policy: EmptyEmail) -> Self {
        self.record_empty_email = policy;
        self
    }

    pub fn decode_empty_email(mut self, policy: EmptyEmail) -> Self {
        self.decode_empty_email = policy;
        self
    }

    pub fn merge_nested(mut self, merge: bool) -> Self {
        self.merge_nested = merge;
        self
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            expected: "true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ValidatorConfig::default();
        assert_eq!(config.record_empty_email, EmptyEmail::Reject);
        assert_eq!(config.decode_empty_email, EmptyEmail::Skip);
        assert!(config.merge_nested);
    }

    #[test]
    fn test_empty_email_from_str() {
        assert_eq!("Skip".parse::<EmptyEmail>(), Ok(EmptyEmail::Skip));
        assert_eq!("reject".parse::<EmptyEmail>(), Ok(EmptyEmail::Reject));

        let err = "maybe".parse::<EmptyEmail>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value for empty_email: 'maybe', expected reject or skip"
        );
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("merge_nested", "off"), Ok(false));
        assert_eq!(parse_bool("merge_nested", "TRUE"), Ok(true));
        assert!(parse_bool("merge_nested", "sometimes").is_err());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: ValidatorConfig =
            serde_json::from_str(r#"{"record_empty_email": "skip"}"#).unwrap();
        assert_eq!(config.record_empty_email, EmptyEmail::Skip);
        assert_eq!(config.decode_empty_email, EmptyEmail::Skip);
        assert!(config.merge_nested);
    }
}
