//! `runbot create` — create a runbot with its route.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::lifecycle::{self, CreateRequest};
use crate::commands::{ProjectArg, opt, resolve_app, resolve_env, resolve_project};
use crate::output::TerminalReporter;

#[derive(Args)]
pub struct CreateArgs {
    /// New runbot name
    pub name: String,

    /// Application version to install (13.0, 14.0, 15.0, ...)
    #[arg(short, long, default_value = "", conflicts_with = "image")]
    pub version: String,

    /// Hypervisor image alias (cannot be combined with --version)
    #[arg(short, long, default_value = "")]
    pub image: String,

    #[command(flatten)]
    pub project: ProjectArg,

    /// URL prefix for the runbot (defaults to the runbot name)
    #[arg(short, long, default_value = "")]
    pub slug: String,

    /// Map the project root URL instead of a slug subdomain
    #[arg(long)]
    pub root: bool,

    /// Environment (dev, staging, production, demo)
    #[arg(short, long, default_value = "")]
    pub env: String,

    /// Application to install
    #[arg(short, long, default_value = "")]
    pub app: String,

    /// Skip the post-creation command set
    #[arg(long)]
    pub no_post_commands: bool,
}

/// Run `runbot create`.
///
/// # Errors
///
/// Returns an error on configuration conflicts, an occupied canonical
/// name, or any hypervisor, routing, or provisioning failure.
pub async fn run(app: &AppContext, args: &CreateArgs) -> Result<()> {
    let project = resolve_project(app, &args.project.project)?;
    let env = resolve_env(app, &project, &args.env);
    let application = resolve_app(app, &project, &args.app);
    let reporter = TerminalReporter::new(&app.output);

    let outcome = lifecycle::create(
        &app.hypervisor,
        &app.config,
        &reporter,
        &CreateRequest {
            name: &args.name,
            project: &project,
            env: &env,
            app: &application,
            image: opt(&args.image),
            version: opt(&args.version),
            slug: &args.slug,
            root: args.root,
            with_post_commands: !args.no_post_commands,
        },
    )
    .await?;

    let out = &app.output;
    out.kv("Name", &outcome.name);
    out.kv("Url", &outcome.url);
    out.kv("Container Name", &outcome.canonical);
    out.kv("Image used", &outcome.image);
    out.kv("Environment", &outcome.environment);
    out.kv("Profiles", &outcome.profiles.join(", "));
    out.kv("Project", &project);
    if let Some(version) = &outcome.version {
        out.kv("Version", version);
    }
    Ok(())
}
