//! `runbot shell` — open an interactive shell inside a runbot.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::InstanceExecutor;
use crate::application::services::lifecycle;
use crate::commands::{ProjectArg, resolve_project};

#[derive(Args)]
pub struct ShellArgs {
    /// Runbot to enter
    pub name: String,

    #[command(flatten)]
    pub project: ProjectArg,

    /// User to open the shell as
    #[arg(short, long, default_value = "odoo")]
    pub user: String,
}

/// Run `runbot shell`.
///
/// Stdio is inherited; the shell's own exit status is not treated as an
/// error.
///
/// # Errors
///
/// Returns an error when the runbot doesn't exist or the session cannot
/// be spawned.
pub async fn run(app: &AppContext, args: &ShellArgs) -> Result<()> {
    let project = resolve_project(app, &args.project.project)?;
    let canonical = lifecycle::ensure_exists(&app.hypervisor, &project, &args.name).await?;

    // Root sessions go straight to bash; everything else re-enters through
    // a login shell for the requested user.
    let argv: Vec<&str> = if args.user == "root" {
        vec!["bash"]
    } else {
        vec!["sudo", "-H", "-i", "-u", &args.user, "bash"]
    };
    app.hypervisor
        .exec_interactive(&project, &canonical, &argv)
        .await?;
    Ok(())
}
