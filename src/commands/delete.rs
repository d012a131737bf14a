//! `runbot delete` — delete a runbot and its route.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::lifecycle;
use crate::commands::{ProjectArg, resolve_project};
use crate::output::TerminalReporter;

#[derive(Args)]
pub struct DeleteArgs {
    /// Runbot to delete
    pub name: String,

    #[command(flatten)]
    pub project: ProjectArg,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

/// Run `runbot delete`.
///
/// Existence is checked before the prompt: a missing runbot exits
/// non-zero without asking anything. Declining the prompt aborts cleanly
/// with no mutation.
///
/// # Errors
///
/// Returns an error when the runbot doesn't exist or a deletion step
/// fails.
pub async fn run(app: &AppContext, args: &DeleteArgs) -> Result<()> {
    let project = resolve_project(app, &args.project.project)?;
    lifecycle::ensure_exists(&app.hypervisor, &project, &args.name).await?;

    if !args.force {
        let prompt = format!(
            "⚠ This operation can't be undone!\nDelete the runbot '{}' on the project '{}'?",
            args.name, project
        );
        if !app.confirm(&prompt, false)? {
            app.output.info("Abort");
            return Ok(());
        }
    }

    let reporter = TerminalReporter::new(&app.output);
    lifecycle::delete(&app.hypervisor, &app.config, &reporter, &project, &args.name).await?;
    app.output.success(&format!("Runbot {} deleted", args.name));
    Ok(())
}
