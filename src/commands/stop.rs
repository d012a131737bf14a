//! `runbot stop` — stop a runbot.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::lifecycle;
use crate::commands::{ProjectArg, resolve_project};

#[derive(Args)]
pub struct StopArgs {
    /// Runbot to stop
    pub name: String,

    #[command(flatten)]
    pub project: ProjectArg,
}

/// Run `runbot stop`.
///
/// # Errors
///
/// Returns an error when the runbot doesn't exist or the hypervisor
/// refuses the stop.
pub async fn run(app: &AppContext, args: &StopArgs) -> Result<()> {
    let project = resolve_project(app, &args.project.project)?;
    let canonical = lifecycle::stop(&app.hypervisor, &project, &args.name).await?;
    app.output.success(&format!("{canonical} stopped"));
    Ok(())
}
