//! `runbot restart` — restart a runbot.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::lifecycle;
use crate::commands::{ProjectArg, resolve_project};

#[derive(Args)]
pub struct RestartArgs {
    /// Runbot to restart
    pub name: String,

    #[command(flatten)]
    pub project: ProjectArg,
}

/// Run `runbot restart`.
///
/// # Errors
///
/// Returns an error when the runbot doesn't exist or the hypervisor
/// refuses the restart.
pub async fn run(app: &AppContext, args: &RestartArgs) -> Result<()> {
    let project = resolve_project(app, &args.project.project)?;
    let canonical = lifecycle::restart(&app.hypervisor, &project, &args.name).await?;
    app.output.success(&format!("{canonical} restarted"));
    Ok(())
}
