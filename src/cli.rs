//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;

/// Disposable application instances on an LXD fleet
#[derive(Parser)]
#[command(
    name = "runbot",
    version,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a runbot with its route
    Create(commands::create::CreateArgs),

    /// Copy a runbot (storage-layer clone) with a new route
    Copy(commands::copy::CopyArgs),

    /// Deploy a branch to a runbot, creating it from a source when absent
    Deploy(commands::deploy::DeployArgs),

    /// Move a runbot to another project
    #[command(name = "move")]
    Move(commands::relocate::MoveArgs),

    /// Rename a runbot (the route is left untouched)
    Rename(commands::rename::RenameArgs),

    /// Start a runbot
    Start(commands::start::StartArgs),

    /// Stop a runbot
    Stop(commands::stop::StopArgs),

    /// Restart a runbot
    Restart(commands::restart::RestartArgs),

    /// Delete a runbot and its route
    Delete(commands::delete::DeleteArgs),

    /// Change a runbot's environment profiles
    SetEnv(commands::set_env::SetEnvArgs),

    /// List the runbots of a project
    List(commands::list::ListArgs),

    /// Run a command inside a runbot as the application user
    Exec(commands::exec::ExecArgs),

    /// Open a shell inside a runbot
    Shell(commands::shell::ShellArgs),

    /// Re-run the post-creation command set on a runbot
    PostCreate(commands::post_create::PostCreateArgs),

    /// Inspect and mutate reverse-proxy routes
    #[command(subcommand)]
    Route(commands::route::RouteCommand),

    /// Save the default project for the current user
    Use(commands::use_project::UseArgs),

    /// List projects
    Projects(commands::projects::ProjectsArgs),

    /// List the configured environments
    Envs,

    /// List configured applications and versions
    Apps(commands::apps::AppsArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails; `main` maps it to a
    /// non-zero exit code.
    pub async fn run(self) -> Result<()> {
        let Cli {
            quiet,
            no_color,
            command,
        } = self;
        let app = AppContext::new(&AppFlags { no_color, quiet })?;
        match command {
            Command::Create(args) => commands::create::run(&app, &args).await,
            Command::Copy(args) => commands::copy::run(&app, &args).await,
            Command::Deploy(args) => commands::deploy::run(&app, &args).await,
            Command::Move(args) => commands::relocate::run(&app, &args).await,
            Command::Rename(args) => commands::rename::run(&app, &args).await,
            Command::Start(args) => commands::start::run(&app, &args).await,
            Command::Stop(args) => commands::stop::run(&app, &args).await,
            Command::Restart(args) => commands::restart::run(&app, &args).await,
            Command::Delete(args) => commands::delete::run(&app, &args).await,
            Command::SetEnv(args) => commands::set_env::run(&app, &args).await,
            Command::List(args) => commands::list::run(&app, &args).await,
            Command::Exec(args) => commands::exec::run(&app, &args).await,
            Command::Shell(args) => commands::shell::run(&app, &args).await,
            Command::PostCreate(args) => commands::post_create::run(&app, &args).await,
            Command::Route(cmd) => commands::route::run(&app, &cmd).await,
            Command::Use(args) => commands::use_project::run(&app, &args).await,
            Command::Projects(args) => commands::projects::run(&app, &args).await,
            Command::Envs => commands::envs::run(&app),
            Command::Apps(args) => commands::apps::run(&app, &args).await,
        }
    }
}
