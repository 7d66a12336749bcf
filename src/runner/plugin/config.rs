//! Engine configuration file parsing.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What to do when `call`, `apply` or `bind` is given no receiver
/// (`undefined`, `null`, or nothing at all).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ReceiverPolicy {
    /// Use the global object, like non-strict JavaScript.
    SubstituteGlobal,
    /// Fail with `MissingReceiver`. Plain calls see `this === undefined`.
    Reject,
}

impl Default for ReceiverPolicy {
    fn default() -> Self {
        ReceiverPolicy::SubstituteGlobal
    }
}

/// Upper bound for `max_call_depth`. The `RangeError` must fire before the
/// native stack runs out, and each script frame takes several native ones.
pub const MAX_CALL_DEPTH_LIMIT: usize = 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: max_call_depth must be between 1 and {limit}, got {value}")]
    CallDepthOutOfRange { value: usize, limit: usize },
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub receiver_policy: ReceiverPolicy,
    /// Nested invocations beyond this raise a `RangeError`.
    pub max_call_depth: usize,
}

impl EngineConfig {
    pub fn new() -> Self {
        EngineConfig {
            receiver_policy: ReceiverPolicy::default(),
            max_call_depth: 256,
        }
    }

    pub fn with_receiver_policy(mut self, receiver_policy: ReceiverPolicy) -> Self {
        self.receiver_policy = receiver_policy;
        self
    }

    /// Load configuration from a TOML file.
    ///
    /// Expected format:
    /// ```toml
    /// receiver_policy = "reject"
    /// max_call_depth = 128
    /// ```
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string. Missing keys take defaults.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_call_depth == 0 || self.max_call_depth > MAX_CALL_DEPTH_LIMIT {
            return Err(ConfigError::CallDepthOutOfRange {
                value: self.max_call_depth,
                limit: MAX_CALL_DEPTH_LIMIT,
            });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = EngineConfig::parse("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.receiver_policy, ReceiverPolicy::SubstituteGlobal);
    }

    #[test]
    fn test_parse_reject_policy() {
        let config = EngineConfig::parse(
            r#"
            receiver_policy = "reject"
            max_call_depth = 16
            "#,
        )
        .unwrap();
        assert_eq!(config.receiver_policy, ReceiverPolicy::Reject);
        assert_eq!(config.max_call_depth, 16);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(matches!(
            EngineConfig::parse("receiver = \"reject\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(EngineConfig::parse("receiver_policy = \"sometimes\"").is_err());
    }

    #[test]
    fn test_call_depth_bounds() {
        let err = EngineConfig::parse("max_call_depth = 100000").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::CallDepthOutOfRange { value: 100000, limit: MAX_CALL_DEPTH_LIMIT }
        ));
        assert!(EngineConfig::parse("max_call_depth = 0").is_err());
        let config = EngineConfig::parse("max_call_depth = 1024").unwrap();
        assert_eq!(config.max_call_depth, MAX_CALL_DEPTH_LIMIT);
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::load(Path::new("/nonexistent/ctxbind.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
