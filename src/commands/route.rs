//! `runbot route` — inspect and mutate reverse-proxy routes directly.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::app::AppContext;
use crate::application::services::routes;
use crate::commands::{ProjectArg, resolve_project};
use crate::domain::naming;
use crate::output::TerminalReporter;

#[derive(Subcommand)]
pub enum RouteCommand {
    /// Create or replace a runbot's route
    Set(RouteSetArgs),

    /// Show a runbot's route configuration
    Show(RouteShowArgs),

    /// Delete a runbot's route
    Delete(RouteShowArgs),

    /// List all route configuration artifacts
    List,
}

#[derive(Args)]
pub struct RouteSetArgs {
    /// Runbot name
    pub name: String,

    #[command(flatten)]
    pub project: ProjectArg,

    /// URL prefix (defaults to the runbot name)
    #[arg(short, long, default_value = "")]
    pub slug: String,
}

#[derive(Args)]
pub struct RouteShowArgs {
    /// Runbot name
    pub name: String,

    #[command(flatten)]
    pub project: ProjectArg,
}

/// Run `runbot route <subcommand>`.
///
/// # Errors
///
/// Returns an error if the proxy instance is unreachable or a route is
/// missing where one is required.
pub async fn run(app: &AppContext, command: &RouteCommand) -> Result<()> {
    match command {
        RouteCommand::Set(args) => {
            let project = resolve_project(app, &args.project.project)?;
            let name = naming::slugify(&args.name);
            let container = naming::canonical_name(&name, &project);
            let slug = if args.slug.is_empty() { name } else { naming::slugify(&args.slug) };
            routes::set_route(
                &app.hypervisor,
                &app.config.proxy_instance,
                &project,
                app.config.project_url(&project),
                &container,
                &slug,
            )
            .await?;
            app.output.success(&format!("route set for {container}"));
        }
        RouteCommand::Show(args) => {
            let project = resolve_project(app, &args.project.project)?;
            let container = naming::canonical_name(&args.name, &project);
            let body = routes::show_route(&app.hypervisor, &app.config.proxy_instance, &container)
                .await?;
            print!("{body}");
        }
        RouteCommand::Delete(args) => {
            let project = resolve_project(app, &args.project.project)?;
            let container = naming::canonical_name(&args.name, &project);
            let reporter = TerminalReporter::new(&app.output);
            routes::delete_route(&app.hypervisor, &reporter, &app.config.proxy_instance, &container)
                .await?;
        }
        RouteCommand::List => {
            let listing = routes::list_routes(&app.hypervisor, &app.config.proxy_instance).await?;
            print!("{listing}");
        }
    }
    Ok(())
}
