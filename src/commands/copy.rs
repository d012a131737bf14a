//! `runbot copy` — storage-layer clone of a runbot, with a new route.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::lifecycle::{self, CopyRequest};
use crate::commands::{ProjectArg, resolve_app, resolve_env, resolve_project};
use crate::output::TerminalReporter;

#[derive(Args)]
pub struct CopyArgs {
    /// Runbot to copy
    pub name: String,

    /// Name of the new runbot
    pub target_name: String,

    #[command(flatten)]
    pub project: ProjectArg,

    /// URL prefix for the new runbot (defaults to the target name)
    #[arg(short, long, default_value = "")]
    pub slug: String,

    /// Environment for the new runbot
    #[arg(short, long, default_value = "")]
    pub env: String,

    /// Application profile set to attach
    #[arg(short, long, default_value = "")]
    pub app: String,
}

/// Run `runbot copy`.
///
/// # Errors
///
/// Source-absent and target-exists are reported before any mutation.
pub async fn run(app: &AppContext, args: &CopyArgs) -> Result<()> {
    let project = resolve_project(app, &args.project.project)?;
    let env = resolve_env(app, &project, &args.env);
    let application = resolve_app(app, &project, &args.app);
    let reporter = TerminalReporter::new(&app.output);

    let outcome = lifecycle::copy(
        &app.hypervisor,
        &app.config,
        &reporter,
        &CopyRequest {
            name: &args.name,
            target_name: &args.target_name,
            project: &project,
            slug: &args.slug,
            env: &env,
            app: &application,
        },
    )
    .await?;

    app.output.kv("Name", &args.target_name);
    app.output.kv("Container Name", &outcome.target);
    app.output.kv("Url", &outcome.url);
    Ok(())
}
