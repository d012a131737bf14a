//! `runbot exec` — run a command inside a runbot as the application user.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::{ExecUser, InstanceExecutor};
use crate::application::services::lifecycle;
use crate::commands::{ProjectArg, resolve_app, resolve_project};
use crate::domain::error::ProvisionError;

#[derive(Args)]
#[command(trailing_var_arg = true)]
pub struct ExecArgs {
    /// Runbot to run the command in
    pub name: String,

    #[command(flatten)]
    pub project: ProjectArg,

    /// Application whose user runs the command
    #[arg(short, long, default_value = "")]
    pub app: String,

    /// Command and arguments to run
    #[arg(required = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Run `runbot exec`.
///
/// # Errors
///
/// A non-zero exit code or non-empty error stream fails the command; the
/// process exits with the in-instance exit code.
pub async fn run(app: &AppContext, args: &ExecArgs) -> Result<()> {
    let project = resolve_project(app, &args.project.project)?;
    let application = resolve_app(app, &project, &args.app);
    let app_cfg = app.config.application(&application)?;
    let canonical = lifecycle::ensure_exists(&app.hypervisor, &project, &args.name).await?;

    let argv: Vec<&str> = args.command.iter().map(String::as_str).collect();
    let user = ExecUser {
        uid: app_cfg.user.uid,
        cwd: app_cfg.user.home.clone(),
    };
    let output = app
        .hypervisor
        .exec(&project, &canonical, &argv, &user, &BTreeMap::new())
        .await
        .with_context(|| format!("running a command in {canonical}"))?;

    print!("{}", String::from_utf8_lossy(&output.stdout));
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() || !stderr.trim().is_empty() {
        return Err(ProvisionError::CommandFailed {
            title: args.command.join(" "),
            code: output.status.code().unwrap_or(1),
            stderr: stderr.trim().to_string(),
        }
        .into());
    }
    Ok(())
}
