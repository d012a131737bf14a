//! `runbot post-create` — re-run the post-creation command set on an
//! existing runbot.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::lifecycle;
use crate::commands::{ProjectArg, resolve_app, resolve_env, resolve_project};
use crate::output::TerminalReporter;

#[derive(Args)]
pub struct PostCreateArgs {
    /// Runbot to provision
    pub name: String,

    /// Application version the bindings refer to
    pub version: String,

    #[command(flatten)]
    pub project: ProjectArg,

    /// Environment binding
    #[arg(short, long, default_value = "")]
    pub env: String,

    /// Application whose command set runs
    #[arg(short, long, default_value = "")]
    pub app: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

/// Run `runbot post-create`.
///
/// # Errors
///
/// Returns an error when the runbot doesn't exist, a placeholder is
/// unbound, or a command fails (its exit code propagates).
pub async fn run(app: &AppContext, args: &PostCreateArgs) -> Result<()> {
    let project = resolve_project(app, &args.project.project)?;
    let env = resolve_env(app, &project, &args.env);
    let application = resolve_app(app, &project, &args.app);

    if !args.force {
        let prompt = format!(
            "⚠ This operation can reset some configuration!\nRun the post-create commands on the runbot '{}' for the project '{}'?",
            args.name, project
        );
        if !app.confirm(&prompt, false)? {
            app.output.info("Abort");
            return Ok(());
        }
    }

    let reporter = TerminalReporter::new(&app.output);
    lifecycle::run_post_create(
        &app.hypervisor,
        &app.config,
        &reporter,
        &project,
        &args.name,
        &args.version,
        &env,
        &application,
    )
    .await?;
    app.output.success("post-create commands finished");
    Ok(())
}
