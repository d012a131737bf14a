//! `runbot projects` — list hypervisor projects with their configuration.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::InstanceInspector;
use crate::output::table;

#[derive(Args)]
pub struct ProjectsArgs {
    /// Include the default project and disabled projects
    #[arg(long)]
    pub all: bool,
}

/// Run `runbot projects`.
///
/// # Errors
///
/// Returns an error if the hypervisor project listing fails.
pub async fn run(app: &AppContext, args: &ProjectsArgs) -> Result<()> {
    let names = app.hypervisor.list_projects().await?;
    let rows: Vec<Vec<String>> = names
        .into_iter()
        .filter(|name| {
            if args.all {
                return true;
            }
            if name == "default" {
                return false;
            }
            !app.config.project(name).is_some_and(|p| p.disabled)
        })
        .map(|name| {
            let (url, description) = app.config.project(&name).map_or(("", ""), |p| {
                (p.url.as_str(), p.description.as_str())
            });
            vec![name, url.to_string(), description.to_string()]
        })
        .collect();

    print!("{}", table::render(&["Name", "Url Suffix", "Description"], &rows));
    Ok(())
}
