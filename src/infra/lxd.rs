//! LXD adapter — routes all hypervisor calls through the `lxc` CLI.
//!
//! `LxdClient<R>` is generic over a `CommandRunner` so tests can inject a
//! runner that returns canned output without spawning processes. Every
//! mutating `lxc` invocation blocks until the daemon reports completion.

use std::collections::BTreeMap;
use std::process::Output;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::application::ports::{
    CopySpec, CreateSpec, ExecUser, InstanceExecutor, InstanceInspector, InstanceLifecycle,
};
use crate::command_runner::{
    CommandRunner, DEFAULT_MUTATE_TIMEOUT, DEFAULT_QUERY_TIMEOUT, TokioCommandRunner,
};
use crate::domain::instance::{InstanceRecord, InstanceStatus};

/// Hypervisor client backed by the `lxc` binary.
///
/// Queries and mutations use separate runners: listings fail fast while
/// storage-moving operations (create, copy, migrate) get a long leash.
pub struct LxdClient<R: CommandRunner> {
    query_runner: R,
    mutate_runner: R,
    /// `lxc` remote name; `None` targets the local daemon socket.
    remote: Option<String>,
}

impl<R: CommandRunner> LxdClient<R> {
    pub fn new(query_runner: R, mutate_runner: R, remote: Option<String>) -> Self {
        Self {
            query_runner,
            mutate_runner,
            remote,
        }
    }

    /// `<remote>:<name>` when a remote is configured, bare `<name>` otherwise.
    fn instance_ref(&self, name: &str) -> String {
        match &self.remote {
            Some(remote) => format!("{remote}:{name}"),
            None => name.to_string(),
        }
    }

    async fn mutate(&self, args: &[String]) -> Result<()> {
        let argv: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = self
            .mutate_runner
            .run("lxc", &argv)
            .await
            .with_context(|| format!("running lxc {}", args.first().map_or("", String::as_str)))?;
        ensure_success(&argv, &output)
    }

    async fn query(&self, args: &[String]) -> Result<Output> {
        let argv: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = self
            .query_runner
            .run("lxc", &argv)
            .await
            .with_context(|| format!("running lxc {}", args.first().map_or("", String::as_str)))?;
        ensure_success(&argv, &output)?;
        Ok(output)
    }
}

impl LxdClient<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner(remote: Option<String>) -> Self {
        Self::new(
            TokioCommandRunner::new(DEFAULT_QUERY_TIMEOUT),
            TokioCommandRunner::new(DEFAULT_MUTATE_TIMEOUT),
            remote,
        )
    }
}

fn ensure_success(argv: &[&str], output: &Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!(
        "lxc {} failed: {}",
        argv.first().unwrap_or(&""),
        stderr.trim()
    )
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(ToString::to_string).collect()
}

impl<R: CommandRunner> InstanceLifecycle for LxdClient<R> {
    async fn create(&self, spec: &CreateSpec<'_>) -> Result<()> {
        let mut cmd = args(&[
            "init",
            spec.image,
            &self.instance_ref(spec.name),
            "--project",
            spec.project,
        ]);
        for profile in spec.profiles {
            cmd.push("--profile".to_string());
            cmd.push(profile.clone());
        }
        self.mutate(&cmd).await
    }

    async fn copy(&self, spec: &CopySpec<'_>) -> Result<()> {
        let mut cmd = args(&[
            "copy",
            &self.instance_ref(spec.source),
            &self.instance_ref(spec.target),
            "--project",
            spec.project,
        ]);
        for profile in spec.profiles {
            cmd.push("--profile".to_string());
            cmd.push(profile.clone());
        }
        self.mutate(&cmd).await
    }

    async fn start(&self, project: &str, name: &str) -> Result<()> {
        self.mutate(&args(&["start", &self.instance_ref(name), "--project", project]))
            .await
    }

    async fn stop(&self, project: &str, name: &str) -> Result<()> {
        self.mutate(&args(&["stop", &self.instance_ref(name), "--project", project]))
            .await
    }

    async fn restart(&self, project: &str, name: &str) -> Result<()> {
        self.mutate(&args(&["restart", &self.instance_ref(name), "--project", project]))
            .await
    }

    async fn rename(&self, project: &str, name: &str, new_name: &str) -> Result<()> {
        self.mutate(&args(&[
            "move",
            &self.instance_ref(name),
            &self.instance_ref(new_name),
            "--project",
            project,
        ]))
        .await
    }

    async fn migrate(&self, project: &str, name: &str, target_project: &str) -> Result<()> {
        self.mutate(&args(&[
            "move",
            &self.instance_ref(name),
            &self.instance_ref(name),
            "--project",
            project,
            "--target-project",
            target_project,
        ]))
        .await
    }

    async fn delete(&self, project: &str, name: &str) -> Result<()> {
        self.mutate(&args(&["delete", &self.instance_ref(name), "--project", project]))
            .await
    }

    async fn apply_profiles(&self, project: &str, name: &str, profiles: &[String]) -> Result<()> {
        self.mutate(&args(&[
            "profile",
            "assign",
            &self.instance_ref(name),
            &profiles.join(","),
            "--project",
            project,
        ]))
        .await
    }
}

impl<R: CommandRunner> InstanceInspector for LxdClient<R> {
    async fn get(&self, project: &str, name: &str) -> Result<Option<InstanceRecord>> {
        let records = self.list(project).await?;
        Ok(records.into_iter().find(|record| record.name == name))
    }

    async fn exists(&self, project: &str, name: &str) -> Result<bool> {
        Ok(self.get(project, name).await?.is_some())
    }

    async fn list(&self, project: &str) -> Result<Vec<InstanceRecord>> {
        let mut cmd = vec!["list".to_string()];
        if let Some(remote) = &self.remote {
            cmd.push(format!("{remote}:"));
        }
        cmd.extend(args(&["--project", project, "--format", "json"]));
        let output = self.query(&cmd).await?;
        let instances: Vec<LxcInstance> =
            serde_json::from_slice(&output.stdout).context("parsing lxc list output")?;
        Ok(instances.into_iter().map(LxcInstance::into_record).collect())
    }

    async fn image_exists(&self, alias: &str) -> Result<bool> {
        let mut cmd = args(&["image", "list"]);
        if let Some(remote) = &self.remote {
            cmd.push(format!("{remote}:"));
        }
        cmd.extend(args(&[alias, "--format", "json"]));
        let output = self.query(&cmd).await?;
        let images: Vec<LxcImage> =
            serde_json::from_slice(&output.stdout).context("parsing lxc image list output")?;
        Ok(images
            .iter()
            .flat_map(|image| &image.aliases)
            .any(|a| a.name == alias))
    }

    async fn list_projects(&self) -> Result<Vec<String>> {
        let mut cmd = args(&["project", "list"]);
        if let Some(remote) = &self.remote {
            cmd.push(format!("{remote}:"));
        }
        cmd.extend(args(&["--format", "json"]));
        let output = self.query(&cmd).await?;
        let projects: Vec<LxcProject> =
            serde_json::from_slice(&output.stdout).context("parsing lxc project list output")?;
        Ok(projects.into_iter().map(|p| p.name).collect())
    }
}

impl<R: CommandRunner> InstanceExecutor for LxdClient<R> {
    async fn exec(
        &self,
        project: &str,
        name: &str,
        argv: &[&str],
        user: &ExecUser,
        env: &BTreeMap<String, String>,
    ) -> Result<Output> {
        let mut cmd = args(&["exec", &self.instance_ref(name), "--project", project]);
        if let Some(uid) = user.uid {
            cmd.push("--user".to_string());
            cmd.push(uid.to_string());
        }
        if let Some(cwd) = &user.cwd {
            cmd.push("--cwd".to_string());
            cmd.push(cwd.clone());
        }
        for (key, value) in env {
            cmd.push("--env".to_string());
            cmd.push(format!("{key}={value}"));
        }
        cmd.push("--".to_string());
        cmd.extend(argv.iter().map(ToString::to_string));

        let full: Vec<&str> = cmd.iter().map(String::as_str).collect();
        self.mutate_runner
            .run("lxc", &full)
            .await
            .with_context(|| format!("running a command in {name}"))
    }

    async fn exec_interactive(
        &self,
        project: &str,
        name: &str,
        argv: &[&str],
    ) -> Result<std::process::ExitStatus> {
        let mut cmd = args(&["exec", &self.instance_ref(name), "--project", project, "--"]);
        cmd.extend(argv.iter().map(ToString::to_string));
        let full: Vec<&str> = cmd.iter().map(String::as_str).collect();
        self.mutate_runner
            .run_status("lxc", &full)
            .await
            .with_context(|| format!("opening a session in {name}"))
    }
}

// ── lxc JSON shapes ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct LxcInstance {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    status_code: i64,
    #[serde(default)]
    profiles: Vec<String>,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    state: Option<LxcInstanceState>,
}

#[derive(Deserialize, Default)]
struct LxcInstanceState {
    #[serde(default)]
    memory: Option<LxcMemoryState>,
}

#[derive(Deserialize, Default)]
struct LxcMemoryState {
    #[serde(default)]
    usage: Option<u64>,
}

#[derive(Deserialize)]
struct LxcImage {
    #[serde(default)]
    aliases: Vec<LxcImageAlias>,
}

#[derive(Deserialize)]
struct LxcImageAlias {
    name: String,
}

#[derive(Deserialize)]
struct LxcProject {
    name: String,
}

impl LxcInstance {
    fn into_record(self) -> InstanceRecord {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc));
        InstanceRecord {
            name: self.name,
            description: self.description,
            status: InstanceStatus::parse(&self.status),
            status_code: self.status_code,
            profiles: self.profiles,
            created_at,
            memory_usage: self.state.and_then(|s| s.memory).and_then(|m| m.usage),
        }
    }
}
