//! Command handlers — thin adapters from clap arguments to the
//! application services.

pub mod apps;
pub mod copy;
pub mod create;
pub mod delete;
pub mod deploy;
pub mod envs;
pub mod exec;
pub mod list;
pub mod post_create;
pub mod projects;
pub mod relocate;
pub mod rename;
pub mod restart;
pub mod route;
pub mod set_env;
pub mod shell;
pub mod start;
pub mod stop;
pub mod use_project;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::SessionStore as _;
use crate::domain::scope;

/// Project selector shared by every instance-scoped command.
#[derive(Args)]
pub struct ProjectArg {
    /// Project holding the runbot (defaults to the stored or global default)
    #[arg(short, long, default_value = "")]
    pub project: String,
}

pub(crate) fn opt(value: &str) -> Option<&str> {
    if value.is_empty() { None } else { Some(value) }
}

/// Effective project: explicit argument, then the per-user stored default,
/// then the global default.
pub(crate) fn resolve_project(app: &AppContext, explicit: &str) -> Result<String> {
    let stored = app.session.default_project()?;
    Ok(scope::resolve_project(
        opt(explicit),
        stored.as_deref(),
        &app.config.default_project,
    ))
}

/// Effective environment: explicit argument, then the project default,
/// then the global default.
pub(crate) fn resolve_env(app: &AppContext, project: &str, explicit: &str) -> String {
    let project_default = app
        .config
        .project(project)
        .and_then(|p| p.default_environment.as_deref());
    scope::resolve_environment(opt(explicit), project_default, &app.config.default_env)
}

/// Effective application: explicit argument, then the project default,
/// then the global default.
pub(crate) fn resolve_app(app: &AppContext, project: &str, explicit: &str) -> String {
    let project_default = app
        .config
        .project(project)
        .and_then(|p| p.default_app.as_deref());
    scope::resolve_application(opt(explicit), project_default, &app.config.default_app)
}
