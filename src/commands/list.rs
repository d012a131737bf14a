//! `runbot list` — list the runbots of a project.

use anyhow::Result;
use clap::Args;
use indicatif::HumanBytes;

use crate::app::AppContext;
use crate::application::services::lifecycle;
use crate::commands::{ProjectArg, resolve_project};
use crate::output::table;

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub project: ProjectArg,

    /// Also show status codes and attached profiles
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run `runbot list`.
///
/// # Errors
///
/// Returns an error if the hypervisor listing fails.
pub async fn run(app: &AppContext, args: &ListArgs) -> Result<()> {
    let project = resolve_project(app, &args.project.project)?;
    let summaries = lifecycle::list(&app.hypervisor, &app.config, &project).await?;

    let mut headers = vec![
        "Name",
        "Description",
        "Status",
        "Url",
        "Environment",
        "Memory",
        "Created at",
    ];
    if args.verbose {
        headers.push("Profiles");
    }

    let rows: Vec<Vec<String>> = summaries
        .iter()
        .map(|summary| {
            let status = if args.verbose {
                format!("{} ({})", summary.status, summary.status_code)
            } else {
                summary.status.clone()
            };
            let mut row = vec![
                summary.name.clone(),
                summary.description.clone(),
                status,
                summary.url.clone(),
                summary.environment.clone().unwrap_or_default(),
                summary
                    .memory_usage
                    .map(|usage| HumanBytes(usage).to_string())
                    .unwrap_or_default(),
                summary
                    .created_at
                    .map(|at| at.format("%d %b %Y %H:%M:%S").to_string())
                    .unwrap_or_default(),
            ];
            if args.verbose {
                row.push(summary.profiles.join(", "));
            }
            row
        })
        .collect();

    print!("{}", table::render(&headers, &rows));
    Ok(())
}
