//! Transform configuration

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default root font size in pixels.
pub const DEFAULT_REM_BASE: f64 = 16.0;

/// What to do with an `env()` reference whose key is not in any table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum UnresolvedPolicy {
    /// Rewrite `env(--key)` to `var(--key)` so runtime theming still works
    #[default]
    #[value(name = "native")]
    NativeVariable,

    /// Leave the reference untouched
    #[value(name = "pass-through")]
    PassThrough,
}

/// Which table wins inside a media feature when a key is in both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BreakpointPrecedence {
    /// Breakpoint table first, then the flattened token table
    #[default]
    #[value(name = "breakpoints")]
    BreakpointsFirst,

    /// Flattened token table first, then the breakpoint table
    #[value(name = "tokens")]
    TokensFirst,
}

/// Configuration for one run of the transform pipeline.
///
/// Passed explicitly to [`Pipeline::new`](crate::Pipeline::new); nothing is
/// read from global state.
///
/// # Example
///
/// ```
/// use stylepass::{TransformConfig, UnresolvedPolicy};
///
/// let config = TransformConfig::new()
///     .with_rem_base(10.0)
///     .with_unresolved(UnresolvedPolicy::PassThrough);
/// assert!(config.validate().is_ok());
/// assert!(TransformConfig::new().with_rem_base(0.0).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct TransformConfig {
    /// Pixels per `rem`
    pub rem_base: f64,

    /// Handling of unknown token keys
    pub unresolved: UnresolvedPolicy,

    /// Table order inside media features
    pub precedence: BreakpointPrecedence,

    /// Register the Length Normalizer
    pub normalize_lengths: bool,

    /// Register the Token Injector
    pub inject_tokens: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            rem_base: DEFAULT_REM_BASE,
            unresolved: UnresolvedPolicy::default(),
            precedence: BreakpointPrecedence::default(),
            normalize_lengths: true,
            inject_tokens: true,
        }
    }
}

impl TransformConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from JSON; missing fields take their defaults.
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    /// Set the rem base.
    pub fn with_rem_base(mut self, rem_base: f64) -> Self {
        self.rem_base = rem_base;
        self
    }

    /// Set the unresolved-reference policy.
    pub fn with_unresolved(mut self, unresolved: UnresolvedPolicy) -> Self {
        self.unresolved = unresolved;
        self
    }

    /// Set breakpoint precedence.
    pub fn with_precedence(mut self, precedence: BreakpointPrecedence) -> Self {
        self.precedence = precedence;
        self
    }

    /// Enable or disable the Length Normalizer.
    pub fn with_normalize_lengths(mut self, enabled: bool) -> Self {
        self.normalize_lengths = enabled;
        self
    }

    /// Enable or disable the Token Injector.
    pub fn with_inject_tokens(mut self, enabled: bool) -> Self {
        self.inject_tokens = enabled;
        self
    }

    /// Check invariants that the transforms rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.rem_base.is_finite() || self.rem_base <= 0.0 {
            return Err(ConfigError::InvalidRemBase(self.rem_base));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TransformConfig::default();
        assert_eq!(config.rem_base, 16.0);
        assert_eq!(config.unresolved, UnresolvedPolicy::NativeVariable);
        assert_eq!(config.precedence, BreakpointPrecedence::BreakpointsFirst);
        assert!(config.normalize_lengths);
        assert!(config.inject_tokens);
    }

    #[test]
    fn test_from_json_partial() {
        let config =
            TransformConfig::from_json(r#"{"rem-base": 10, "unresolved": "pass-through"}"#)
                .unwrap();
        assert_eq!(config.rem_base, 10.0);
        assert_eq!(config.unresolved, UnresolvedPolicy::PassThrough);
        assert!(config.inject_tokens);
    }

    #[test]
    fn test_from_json_unknown_field() {
        assert!(TransformConfig::from_json(r#"{"base": 10}"#).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_base() {
        for base in [0.0, -16.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                TransformConfig::new().with_rem_base(base).validate(),
                Err(ConfigError::InvalidRemBase(_))
            ));
        }
    }
}
