//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`. All error
//! types implement `thiserror::Error` and convert to `anyhow::Error` via
//! the `?` operator.

use thiserror::Error;

// ── Configuration errors ──────────────────────────────────────────────────────

/// Scope and configuration failures, raised before any mutation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment '{env}' is not valid. Valid environments: {valid}")]
    InvalidEnvironment { env: String, valid: String },

    #[error("Application '{0}' is not available. See 'runbot apps'.")]
    UnknownApplication(String),

    #[error("Project '{0}' doesn't exist. See 'runbot projects'.")]
    UnknownProject(String),

    #[error("Version '{version}' is not available for the application '{app}'.")]
    UnknownVersion { app: String, version: String },

    #[error("Image '{0}' not found.")]
    UnknownImage(String),

    #[error("An image and a version cannot both be given.")]
    ImageAndVersion,

    #[error("Either an image or a version is required.")]
    ImageOrVersionRequired,

    #[error("Remote access needs the client credential pair {0}.crt / {0}.key")]
    MissingCredentials(String),
}

// ── Fleet errors ──────────────────────────────────────────────────────────────

/// Name conflicts, detected before any hypervisor mutation.
#[derive(Debug, Error)]
pub enum FleetError {
    #[error("Runbot '{0}' doesn't exist!")]
    NotFound(String),

    #[error("Runbot '{0}' already exists!")]
    AlreadyExists(String),
}

// ── Provisioning errors ───────────────────────────────────────────────────────

/// Template expansion failures. Fatal for the whole command set: expansion
/// runs before the first command executes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("No binding for placeholder '${{{placeholder}}}' in '{within}'")]
    UnboundVariable { placeholder: String, within: String },

    #[error("Unterminated '${{' placeholder in '{0}'")]
    Unterminated(String),
}

/// An in-instance command failed; the remaining sequence is aborted and the
/// process exits with the command's code.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("'{title}' failed with exit code {code}: {stderr}")]
    CommandFailed {
        title: String,
        code: i32,
        stderr: String,
    },
}
