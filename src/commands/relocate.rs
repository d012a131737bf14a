//! `runbot move` — move a runbot to another project.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::lifecycle::{self, MoveRequest};
use crate::commands::{ProjectArg, resolve_project};
use crate::output::TerminalReporter;

#[derive(Args)]
pub struct MoveArgs {
    /// Runbot to move
    pub name: String,

    /// Destination project
    pub target_project: String,

    /// URL prefix in the destination project (defaults to the runbot name)
    #[arg(short, long, default_value = "")]
    pub slug: String,

    #[command(flatten)]
    pub project: ProjectArg,
}

/// Run `runbot move`.
///
/// # Errors
///
/// Any step failure aborts and is surfaced; a partially moved runbot is
/// left for manual recovery.
pub async fn run(app: &AppContext, args: &MoveArgs) -> Result<()> {
    let project = resolve_project(app, &args.project.project)?;
    let reporter = TerminalReporter::new(&app.output);

    let outcome = lifecycle::relocate(
        &app.hypervisor,
        &app.config,
        &reporter,
        &MoveRequest {
            name: &args.name,
            project: &project,
            target_project: &args.target_project,
            slug: &args.slug,
        },
    )
    .await?;

    app.output.kv("Container Name", &outcome.target);
    app.output.kv("Url", &outcome.url);
    app.output
        .success(&format!("'{}' moved to the project '{}'", args.name, args.target_project));
    Ok(())
}
