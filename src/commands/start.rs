//! `runbot start` — start a runbot.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::lifecycle;
use crate::commands::{ProjectArg, resolve_project};

#[derive(Args)]
pub struct StartArgs {
    /// Runbot to start
    pub name: String,

    #[command(flatten)]
    pub project: ProjectArg,
}

/// Run `runbot start`.
///
/// # Errors
///
/// Returns an error when the runbot doesn't exist or the hypervisor
/// refuses the start.
pub async fn run(app: &AppContext, args: &StartArgs) -> Result<()> {
    let project = resolve_project(app, &args.project.project)?;
    let canonical = lifecycle::start(&app.hypervisor, &project, &args.name).await?;
    app.output.success(&format!("{canonical} started"));
    Ok(())
}
