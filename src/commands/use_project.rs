//! `runbot use` — persist the default project for the current user.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::SessionStore as _;
use crate::application::services::lifecycle;

#[derive(Args)]
pub struct UseArgs {
    /// Project to use for the next commands
    pub project: String,
}

/// Run `runbot use`.
///
/// # Errors
///
/// Returns an error when the project doesn't exist on the hypervisor or
/// the session file cannot be written.
pub async fn run(app: &AppContext, args: &UseArgs) -> Result<()> {
    lifecycle::ensure_project(&app.hypervisor, &args.project).await?;
    app.session.set_default_project(&args.project)?;
    app.output
        .success(&format!("default project set to '{}'", args.project));
    Ok(())
}
