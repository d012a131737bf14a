//! `runbot rename` — rename a runbot within its project.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::lifecycle;
use crate::commands::{ProjectArg, resolve_project};
use crate::output::TerminalReporter;

#[derive(Args)]
pub struct RenameArgs {
    /// Runbot to rename
    pub name: String,

    /// New runbot name
    pub new_name: String,

    #[command(flatten)]
    pub project: ProjectArg,
}

/// Run `runbot rename`.
///
/// The route is not updated; a stale route for the old name must be
/// deleted with `runbot route delete`.
///
/// # Errors
///
/// On failure the instance may be left stopped under the old name.
pub async fn run(app: &AppContext, args: &RenameArgs) -> Result<()> {
    let project = resolve_project(app, &args.project.project)?;
    let reporter = TerminalReporter::new(&app.output);
    let renamed =
        lifecycle::rename(&app.hypervisor, &reporter, &project, &args.name, &args.new_name).await?;
    app.output.success(&format!("renamed to {renamed}"));
    Ok(())
}
