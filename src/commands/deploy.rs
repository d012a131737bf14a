//! `runbot deploy` — deploy a branch to a runbot, creating it from a
//! source runbot when absent.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::lifecycle::{self, DeployRequest};
use crate::commands::{ProjectArg, resolve_app, resolve_env, resolve_project};
use crate::output::TerminalReporter;

#[derive(Args)]
pub struct DeployArgs {
    /// Runbot to deploy to
    pub name: String,

    /// Branch to deploy
    pub branch: String,

    /// Source runbot to copy when the target doesn't exist yet
    #[arg(long, default_value = "")]
    pub source_name: String,

    #[command(flatten)]
    pub project: ProjectArg,

    /// URL prefix when a new runbot is created
    #[arg(short, long, default_value = "")]
    pub slug: String,

    /// Update every module instead of auto-detecting changed ones
    #[arg(long)]
    pub update_all: bool,

    /// Environment when a new runbot is created
    #[arg(short, long, default_value = "")]
    pub env: String,

    /// Application to update
    #[arg(short, long, default_value = "")]
    pub app: String,
}

/// Run `runbot deploy`.
///
/// # Errors
///
/// Returns an error when the runbot is absent with no `--source-name`, or
/// when the in-instance update command fails (its exit code propagates).
pub async fn run(app: &AppContext, args: &DeployArgs) -> Result<()> {
    let project = resolve_project(app, &args.project.project)?;
    let env = resolve_env(app, &project, &args.env);
    let application = resolve_app(app, &project, &args.app);
    let reporter = TerminalReporter::new(&app.output);

    let stdout = lifecycle::deploy(
        &app.hypervisor,
        &app.config,
        &reporter,
        &DeployRequest {
            name: &args.name,
            branch: &args.branch,
            source_name: &args.source_name,
            project: &project,
            slug: &args.slug,
            update_all: args.update_all,
            env: &env,
            app: &application,
        },
    )
    .await?;

    if !stdout.is_empty() {
        print!("{stdout}");
    }
    app.output.success(&format!("branch '{}' deployed on '{}'", args.branch, args.name));
    Ok(())
}
