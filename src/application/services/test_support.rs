//! Shared stub infrastructure for service tests.
//!
//! Provides canned process outputs and an in-memory `Hypervisor` double so
//! each test module doesn't re-define the same boilerplate.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Output};

use anyhow::Result;

use crate::application::ports::{
    CopySpec, CreateSpec, ExecUser, InstanceExecutor, InstanceInspector, InstanceLifecycle,
    ProgressReporter,
};
use crate::domain::instance::{InstanceRecord, InstanceStatus};

// ── Output helpers ────────────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: ExitStatus::from_raw(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn fail_output(stderr: &[u8]) -> Output {
    Output {
        status: ExitStatus::from_raw(1 << 8),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

pub fn output_with_stderr(stderr: &[u8]) -> Output {
    Output {
        status: ExitStatus::from_raw(0),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Reporter stub ─────────────────────────────────────────────────────────────

pub struct ReporterStub;

impl ProgressReporter for ReporterStub {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}

// ── Fleet double ──────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct FakeInstance {
    pub status: InstanceStatus,
    pub profiles: Vec<String>,
}

/// In-memory fleet: instances keyed by (project, name), the proxy's route
/// configuration directory, and a flattened call trace for order checks.
pub struct FakeFleet {
    pub proxy: String,
    pub projects: Vec<String>,
    pub images: Vec<String>,
    pub instances: RefCell<BTreeMap<(String, String), FakeInstance>>,
    pub route_files: RefCell<BTreeSet<String>>,
    pub calls: RefCell<Vec<String>>,
    /// Call-trace prefix that fails when reached (partial-failure tests).
    pub fail_on: Option<&'static str>,
}

impl FakeFleet {
    pub fn new() -> Self {
        Self {
            proxy: "proxy".to_string(),
            projects: vec!["runbots".to_string(), "demo".to_string()],
            images: vec!["debian-10-odoo-15-0".to_string()],
            instances: RefCell::new(BTreeMap::new()),
            route_files: RefCell::new(BTreeSet::new()),
            calls: RefCell::new(Vec::new()),
            fail_on: None,
        }
    }

    #[must_use]
    pub fn with_instance(self, project: &str, name: &str, status: InstanceStatus) -> Self {
        self.instances.borrow_mut().insert(
            (project.to_string(), name.to_string()),
            FakeInstance {
                status,
                profiles: vec!["dev".to_string(), "default".to_string(), "odoo".to_string()],
            },
        );
        self
    }

    #[must_use]
    pub fn with_route(self, container: &str) -> Self {
        self.route_files
            .borrow_mut()
            .insert(format!("/etc/traefik/conf.d/{container}_odoo.toml"));
        self
    }

    #[must_use]
    pub fn failing_on(mut self, prefix: &'static str) -> Self {
        self.fail_on = Some(prefix);
        self
    }

    pub fn trace(&self, call: String) -> Result<()> {
        let failing = self.fail_on.is_some_and(|prefix| call.starts_with(prefix));
        self.calls.borrow_mut().push(call.clone());
        if failing {
            anyhow::bail!("{call} failed");
        }
        Ok(())
    }

    fn key(project: &str, name: &str) -> (String, String) {
        (project.to_string(), name.to_string())
    }

    fn status_code(status: &InstanceStatus) -> i64 {
        match status {
            InstanceStatus::Running => 103,
            InstanceStatus::Frozen => 110,
            _ => 102,
        }
    }
}

impl InstanceLifecycle for FakeFleet {
    async fn create(&self, spec: &CreateSpec<'_>) -> Result<()> {
        self.trace(format!(
            "create {}/{} image={} profiles={}",
            spec.project,
            spec.name,
            spec.image,
            spec.profiles.join(",")
        ))?;
        self.instances.borrow_mut().insert(
            Self::key(spec.project, spec.name),
            FakeInstance {
                status: InstanceStatus::Stopped,
                profiles: spec.profiles.to_vec(),
            },
        );
        Ok(())
    }

    async fn copy(&self, spec: &CopySpec<'_>) -> Result<()> {
        self.trace(format!(
            "copy {}/{} -> {}",
            spec.project, spec.source, spec.target
        ))?;
        self.instances.borrow_mut().insert(
            Self::key(spec.project, spec.target),
            FakeInstance {
                status: InstanceStatus::Stopped,
                profiles: spec.profiles.to_vec(),
            },
        );
        Ok(())
    }

    async fn start(&self, project: &str, name: &str) -> Result<()> {
        self.trace(format!("start {project}/{name}"))?;
        if let Some(instance) = self.instances.borrow_mut().get_mut(&Self::key(project, name)) {
            instance.status = InstanceStatus::Running;
        }
        Ok(())
    }

    async fn stop(&self, project: &str, name: &str) -> Result<()> {
        self.trace(format!("stop {project}/{name}"))?;
        if let Some(instance) = self.instances.borrow_mut().get_mut(&Self::key(project, name)) {
            instance.status = InstanceStatus::Stopped;
        }
        Ok(())
    }

    async fn restart(&self, project: &str, name: &str) -> Result<()> {
        self.trace(format!("restart {project}/{name}"))
    }

    async fn rename(&self, project: &str, name: &str, new_name: &str) -> Result<()> {
        self.trace(format!("rename {project}/{name} -> {new_name}"))?;
        let mut instances = self.instances.borrow_mut();
        if let Some(instance) = instances.remove(&Self::key(project, name)) {
            instances.insert(Self::key(project, new_name), instance);
        }
        Ok(())
    }

    async fn migrate(&self, project: &str, name: &str, target_project: &str) -> Result<()> {
        self.trace(format!("migrate {project}/{name} -> {target_project}"))?;
        let mut instances = self.instances.borrow_mut();
        if let Some(instance) = instances.remove(&Self::key(project, name)) {
            instances.insert(Self::key(target_project, name), instance);
        }
        Ok(())
    }

    async fn delete(&self, project: &str, name: &str) -> Result<()> {
        self.trace(format!("delete {project}/{name}"))?;
        self.instances.borrow_mut().remove(&Self::key(project, name));
        Ok(())
    }

    async fn apply_profiles(&self, project: &str, name: &str, profiles: &[String]) -> Result<()> {
        self.trace(format!("profiles {project}/{name} = {}", profiles.join(",")))?;
        if let Some(instance) = self.instances.borrow_mut().get_mut(&Self::key(project, name)) {
            instance.profiles = profiles.to_vec();
        }
        Ok(())
    }
}

impl InstanceInspector for FakeFleet {
    async fn get(&self, project: &str, name: &str) -> Result<Option<InstanceRecord>> {
        Ok(self
            .instances
            .borrow()
            .get(&Self::key(project, name))
            .map(|instance| InstanceRecord {
                name: name.to_string(),
                description: String::new(),
                status: instance.status.clone(),
                status_code: Self::status_code(&instance.status),
                profiles: instance.profiles.clone(),
                created_at: None,
                memory_usage: None,
            }))
    }

    async fn exists(&self, project: &str, name: &str) -> Result<bool> {
        Ok(self.instances.borrow().contains_key(&Self::key(project, name)))
    }

    async fn list(&self, project: &str) -> Result<Vec<InstanceRecord>> {
        let instances = self.instances.borrow();
        Ok(instances
            .iter()
            .filter(|((p, _), _)| p == project)
            .map(|((_, name), instance)| InstanceRecord {
                name: name.clone(),
                description: String::new(),
                status: instance.status.clone(),
                status_code: Self::status_code(&instance.status),
                profiles: instance.profiles.clone(),
                created_at: None,
                memory_usage: None,
            })
            .collect())
    }

    async fn image_exists(&self, alias: &str) -> Result<bool> {
        Ok(self.images.iter().any(|image| image == alias))
    }

    async fn list_projects(&self) -> Result<Vec<String>> {
        Ok(self.projects.clone())
    }
}

impl InstanceExecutor for FakeFleet {
    async fn exec(
        &self,
        project: &str,
        name: &str,
        argv: &[&str],
        user: &ExecUser,
        _env: &BTreeMap<String, String>,
    ) -> Result<Output> {
        self.trace(format!(
            "exec {project}/{name} [{}] uid={}",
            argv.join(" "),
            user.uid.map_or_else(|| "root".to_string(), |uid| uid.to_string()),
        ))?;

        // Simulate the proxy instance's command surface.
        if project == "default" && name == self.proxy {
            match argv.first().copied() {
                Some("add-odoo-container.sh") => {
                    let container = argv
                        .iter()
                        .position(|a| *a == "-c")
                        .and_then(|i| argv.get(i + 1))
                        .expect("-c argument");
                    self.route_files
                        .borrow_mut()
                        .insert(format!("/etc/traefik/conf.d/{container}_odoo.toml"));
                    return Ok(ok_output(b""));
                }
                Some("rm") => {
                    let path = argv.last().expect("rm path");
                    let removed = self.route_files.borrow_mut().remove(*path);
                    if !removed && !argv.contains(&"-f") {
                        return Ok(fail_output(b"No such file or directory"));
                    }
                    return Ok(ok_output(b""));
                }
                Some("cat") => {
                    let path = argv.last().expect("cat path");
                    return if self.route_files.borrow().contains(*path) {
                        Ok(ok_output(b"[http.routers]"))
                    } else {
                        Ok(fail_output(b"No such file or directory"))
                    };
                }
                Some("ls") => {
                    let listing = self
                        .route_files
                        .borrow()
                        .iter()
                        .cloned()
                        .collect::<Vec<_>>()
                        .join("\n");
                    return Ok(ok_output(listing.as_bytes()));
                }
                _ => {}
            }
        }

        if argv.first() == Some(&"false") {
            return Ok(fail_output(b"exit 1"));
        }
        Ok(ok_output(b""))
    }

    async fn exec_interactive(
        &self,
        project: &str,
        name: &str,
        argv: &[&str],
    ) -> Result<std::process::ExitStatus> {
        self.trace(format!("shell {project}/{name} [{}]", argv.join(" ")))?;
        Ok(ExitStatus::from_raw(0))
    }
}
