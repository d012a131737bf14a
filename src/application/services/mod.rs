//! Application services — the lifecycle orchestrator and its collaborators.

pub mod lifecycle;
pub mod provision;
pub mod routes;

#[cfg(test)]
pub(crate) mod test_support;

use std::process::Output;

use crate::domain::error::ProvisionError;

/// In-instance command result check shared by routing, provisioning, and
/// deploy: a non-zero exit code or a non-empty error stream is fatal.
pub(crate) fn check_exec(title: &str, output: &Output) -> Result<(), ProvisionError> {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if output.status.success() && stderr.trim().is_empty() {
        return Ok(());
    }
    Err(ProvisionError::CommandFailed {
        title: title.to_string(),
        code: output.status.code().unwrap_or(1),
        stderr: stderr.trim().to_string(),
    })
}
