//! Environment validation and derivation.
//!
//! Environments form a closed set carried by configuration; operation
//! input never extends it.

use crate::domain::error::ConfigError;

/// Built-in closed set, used when the configuration doesn't override it.
pub const DEFAULT_ENVIRONMENTS: &[&str] = &["dev", "staging", "production", "demo"];

/// Validate a resolved environment against the configured closed set.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvironment` when `env` is outside the set.
pub fn check_environment(env: &str, available: &[String]) -> Result<(), ConfigError> {
    if available.iter().any(|e| e == env) {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvironment {
            env: env.to_string(),
            valid: available.join(", "),
        })
    }
}

/// The environment an instance runs in is one of its attached profiles.
#[must_use]
pub fn from_profiles<'a>(profiles: &'a [String], available: &[String]) -> Option<&'a str> {
    profiles
        .iter()
        .map(String::as_str)
        .find(|profile| available.iter().any(|env| env == profile))
}
