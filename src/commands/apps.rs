//! `runbot apps` — list configured applications and versions whose image
//! exists on the hypervisor.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::InstanceInspector;
use crate::output::table;

#[derive(Args)]
pub struct AppsArgs {
    /// Also show the backing image alias
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run `runbot apps`.
///
/// Versions whose image alias is absent from the hypervisor are hidden —
/// they cannot be used by `runbot create`.
///
/// # Errors
///
/// Returns an error if an image lookup fails.
pub async fn run(app: &AppContext, args: &AppsArgs) -> Result<()> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    for (name, application) in &app.config.applications {
        for (version, config) in &application.versions {
            if !app.hypervisor.image_exists(&config.image_alias).await? {
                continue;
            }
            let mut row = vec![name.clone(), version.clone()];
            if args.verbose {
                row.push(config.image_alias.clone());
            }
            rows.push(row);
        }
    }

    let mut headers = vec!["Application", "Version"];
    if args.verbose {
        headers.push("Image alias");
    }
    print!("{}", table::render(&headers, &rows));
    Ok(())
}
