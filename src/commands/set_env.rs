//! `runbot set-env` — change a runbot's environment profiles.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::lifecycle;
use crate::commands::{ProjectArg, resolve_app, resolve_project};

#[derive(Args)]
pub struct SetEnvArgs {
    /// Runbot to update
    pub name: String,

    /// New environment (dev, staging, production, demo)
    pub env: String,

    #[command(flatten)]
    pub project: ProjectArg,

    /// Application whose profile set applies
    #[arg(short, long, default_value = "")]
    pub app: String,
}

/// Run `runbot set-env`.
///
/// The instance is not restarted; profile changes that only apply at boot
/// need an explicit `runbot restart`.
///
/// # Errors
///
/// Returns an error for environments outside the closed set or a missing
/// runbot.
pub async fn run(app: &AppContext, args: &SetEnvArgs) -> Result<()> {
    let project = resolve_project(app, &args.project.project)?;
    let application = resolve_app(app, &project, &args.app);
    let profiles = lifecycle::set_environment(
        &app.hypervisor,
        &app.config,
        &project,
        &args.name,
        &args.env,
        &application,
    )
    .await?;
    app.output.kv("Environment", &args.env);
    app.output.kv("Profiles", &profiles.join(", "));
    Ok(())
}
