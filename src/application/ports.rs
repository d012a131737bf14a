//! Port trait definitions for the application layer.
//!
//! Ports are the contracts infrastructure must fulfill. This file imports
//! only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::collections::BTreeMap;
use std::process::Output;

use anyhow::Result;

use crate::domain::instance::InstanceRecord;

// ── Value types ───────────────────────────────────────────────────────────────

/// Parameters for creating an instance from an image. Struct-based to
/// avoid breaking test doubles on future parameter additions.
pub struct CreateSpec<'a> {
    pub project: &'a str,
    pub name: &'a str,
    /// Hypervisor image alias, e.g. `debian-10-odoo-15-0`.
    pub image: &'a str,
    /// Ordered attachment list; the first profile wins on limit conflicts.
    pub profiles: &'a [String],
}

/// Parameters for a storage-layer clone of an existing instance.
pub struct CopySpec<'a> {
    pub project: &'a str,
    pub source: &'a str,
    pub target: &'a str,
    pub profiles: &'a [String],
}

/// Identity to run in-instance commands under.
#[derive(Debug, Clone, Default)]
pub struct ExecUser {
    /// Numeric uid inside the instance; `None` runs as root.
    pub uid: Option<u32>,
    /// Working directory; `None` uses the instance default.
    pub cwd: Option<String>,
}

// ── Hypervisor port traits ────────────────────────────────────────────────────

/// Instance lifecycle mutations. Every call blocks until the hypervisor
/// reports completion.
#[allow(async_fn_in_trait)]
pub trait InstanceLifecycle {
    /// Create a stopped instance from an image.
    async fn create(&self, spec: &CreateSpec<'_>) -> Result<()>;
    /// Storage-layer clone within one project (no full data duplication).
    async fn copy(&self, spec: &CopySpec<'_>) -> Result<()>;
    async fn start(&self, project: &str, name: &str) -> Result<()>;
    async fn stop(&self, project: &str, name: &str) -> Result<()>;
    async fn restart(&self, project: &str, name: &str) -> Result<()>;
    /// Rename within a project; the instance must be stopped.
    async fn rename(&self, project: &str, name: &str, new_name: &str) -> Result<()>;
    /// Non-live relocation to another project; the instance must be stopped.
    async fn migrate(&self, project: &str, name: &str, target_project: &str) -> Result<()>;
    async fn delete(&self, project: &str, name: &str) -> Result<()>;
    /// Replace the instance's profile attachment, preserving order.
    async fn apply_profiles(&self, project: &str, name: &str, profiles: &[String]) -> Result<()>;
}

/// Read-only hypervisor state.
#[allow(async_fn_in_trait)]
pub trait InstanceInspector {
    async fn get(&self, project: &str, name: &str) -> Result<Option<InstanceRecord>>;
    async fn exists(&self, project: &str, name: &str) -> Result<bool>;
    async fn list(&self, project: &str) -> Result<Vec<InstanceRecord>>;
    /// Whether an image with the given alias exists on the hypervisor.
    async fn image_exists(&self, alias: &str) -> Result<bool>;
    /// Names of all projects in the hypervisor registry.
    async fn list_projects(&self) -> Result<Vec<String>>;
}

/// Command execution inside an instance.
#[allow(async_fn_in_trait)]
pub trait InstanceExecutor {
    /// Execute and capture output. The caller inspects the exit status
    /// and error stream.
    async fn exec(
        &self,
        project: &str,
        name: &str,
        argv: &[&str],
        user: &ExecUser,
        env: &BTreeMap<String, String>,
    ) -> Result<Output>;

    /// Execute with inherited stdio (interactive shells).
    async fn exec_interactive(
        &self,
        project: &str,
        name: &str,
        argv: &[&str],
    ) -> Result<std::process::ExitStatus>;
}

/// Composite trait — any type implementing the three sub-traits is a
/// `Hypervisor`.
pub trait Hypervisor: InstanceLifecycle + InstanceInspector + InstanceExecutor {}

/// Blanket implementation: the three sub-traits make a `Hypervisor`.
impl<T> Hypervisor for T where T: InstanceLifecycle + InstanceInspector + InstanceExecutor {}

// ── Progress reporting port ───────────────────────────────────────────────────

/// Progress events emitted by services without depending on the
/// presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Session port ──────────────────────────────────────────────────────────────

/// Per-user persisted defaults: the stored default project consulted by
/// the scope resolver between an explicit argument and the global default.
pub trait SessionStore {
    /// # Errors
    ///
    /// Returns an error if the session file exists but cannot be read.
    fn default_project(&self) -> Result<Option<String>>;
    /// # Errors
    ///
    /// Returns an error if the session file cannot be written.
    fn set_default_project(&self, project: &str) -> Result<()>;
}
