//! Application context — unified state passed to every command handler.
//!
//! Constructed once in `Cli::run()`; adding a cross-cutting concern means
//! one field change here, zero command signature changes.

use anyhow::Result;

use crate::command_runner::TokioCommandRunner;
use crate::domain::config::{RemoteConfig, RunbotConfig};
use crate::domain::error::ConfigError;
use crate::infra::config::YamlConfigStore;
use crate::infra::lxd::LxdClient;
use crate::infra::session::SessionManager;
use crate::output::OutputContext;

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Loaded configuration (file or built-in defaults).
    pub config: RunbotConfig,
    /// Hypervisor client.
    pub hypervisor: LxdClient<TokioCommandRunner>,
    /// Per-user session defaults.
    pub session: SessionManager,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when the `CI` or `RUNBOT_YES` environment variables are
    /// present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded, remote
    /// credentials are missing, or the home directory is unknown.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let config = YamlConfigStore.load()?;
        if let Some(remote) = &config.remote {
            check_remote_credentials(remote)?;
        }
        let non_interactive = std::env::var("CI").is_ok() || std::env::var("RUNBOT_YES").is_ok();

        Ok(Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            hypervisor: LxdClient::default_runner(config.remote.as_ref().map(|r| r.name.clone())),
            config,
            session: SessionManager::new()?,
            non_interactive,
        })
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI or `RUNBOT_YES`), returns
    /// `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}

/// The client credential pair is required before talking to a non-local
/// endpoint; provisioning the pair itself is out of scope.
fn check_remote_credentials(remote: &RemoteConfig) -> Result<()> {
    let prefix = expand_home(&remote.key_prefix);
    let cert = std::path::PathBuf::from(format!("{prefix}.crt"));
    let key = std::path::PathBuf::from(format!("{prefix}.key"));
    if cert.exists() && key.exists() {
        Ok(())
    } else {
        Err(ConfigError::MissingCredentials(remote.key_prefix.clone()).into())
    }
}

fn expand_home(path: &str) -> String {
    path.strip_prefix("~/").map_or_else(
        || path.to_string(),
        |rest| {
            dirs::home_dir().map_or_else(
                || path.to_string(),
                |home| home.join(rest).to_string_lossy().into_owned(),
            )
        },
    )
}
