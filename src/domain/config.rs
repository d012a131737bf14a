//! Runbot configuration schema and lookups.
//!
//! Pure data and validation — loading lives in `infra::config`. The
//! defaults mirror a stock fleet: a `runbot` tenant project, a `demo`
//! project, and an `odoo` application with one image alias per version.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::environment::DEFAULT_ENVIRONMENTS;
use crate::domain::error::ConfigError;
use crate::domain::template::CommandSpec;

// ── Schema ───────────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.runbot/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunbotConfig {
    /// Project used when neither an argument nor a stored default names one.
    pub default_project: String,
    pub default_env: String,
    pub default_app: String,
    /// `default`-project instance hosting the reverse proxy.
    pub proxy_instance: String,
    /// Closed set of environments; operation input is validated against it.
    pub environments: Vec<String>,
    pub projects: BTreeMap<String, ProjectConfig>,
    pub applications: BTreeMap<String, ApplicationConfig>,
    /// Remote hypervisor access; absent means the local socket.
    pub remote: Option<RemoteConfig>,
}

/// One tenancy scope. Projects are configuration-defined; the orchestrator
/// never creates them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Base URL all runbot routes of this project hang under.
    pub url: String,
    pub description: String,
    pub default_app: Option<String>,
    pub default_environment: Option<String>,
    pub disabled: bool,
}

/// One managed application: versions map to hypervisor image aliases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    pub versions: BTreeMap<String, VersionConfig>,
    pub required_profiles: Vec<String>,
    pub user: AppUser,
    pub post_create_commands: Vec<CommandSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionConfig {
    pub image_alias: String,
    pub description: String,
}

/// Unprivileged identity provisioning commands run under.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppUser {
    pub name: String,
    pub uid: Option<u32>,
    pub home: Option<String>,
}

impl Default for AppUser {
    fn default() -> Self {
        Self {
            name: "odoo".to_string(),
            uid: None,
            home: None,
        }
    }
}

/// Remote hypervisor endpoint, addressed through a named `lxc` remote.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// `lxc` remote name to target.
    pub name: String,
    /// Client credential pair (`<prefix>.crt` / `<prefix>.key`), checked
    /// before any remote operation.
    pub key_prefix: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            key_prefix: "~/.ssh/runbot_lxd".to_string(),
        }
    }
}

impl Default for RunbotConfig {
    fn default() -> Self {
        Self {
            default_project: "runbot".to_string(),
            default_env: "dev".to_string(),
            default_app: "odoo".to_string(),
            proxy_instance: "proxy".to_string(),
            environments: DEFAULT_ENVIRONMENTS.iter().map(ToString::to_string).collect(),
            projects: default_projects(),
            applications: default_applications(),
            remote: None,
        }
    }
}

fn default_projects() -> BTreeMap<String, ProjectConfig> {
    BTreeMap::from([
        (
            "runbot".to_string(),
            ProjectConfig {
                description: "Default project to store runbot instances".to_string(),
                ..ProjectConfig::default()
            },
        ),
        (
            "demo".to_string(),
            ProjectConfig {
                description: "Project to store demo instances".to_string(),
                default_environment: Some("demo".to_string()),
                ..ProjectConfig::default()
            },
        ),
    ])
}

fn default_applications() -> BTreeMap<String, ApplicationConfig> {
    let versions = ["12.0", "13.0", "14.0", "15.0"]
        .iter()
        .map(|version| {
            let suffix = version.replace('.', "-");
            (
                (*version).to_string(),
                VersionConfig {
                    image_alias: format!("debian-10-odoo-{suffix}"),
                    description: format!("Debian 10 - Odoo {version}"),
                },
            )
        })
        .collect();

    BTreeMap::from([(
        "odoo".to_string(),
        ApplicationConfig {
            versions,
            required_profiles: vec!["default".to_string(), "odoo".to_string()],
            user: AppUser {
                name: "odoo".to_string(),
                uid: Some(4001),
                home: Some("/opt/local/odoo".to_string()),
            },
            post_create_commands: default_post_create_commands(),
        },
    )])
}

fn default_post_create_commands() -> Vec<CommandSpec> {
    let plain = |title: &str, command: &str| CommandSpec {
        title: title.to_string(),
        command: command.to_string(),
        environments: BTreeMap::new(),
    };
    vec![
        plain("Update Odoo community", "git -C odoo/community pull"),
        plain("Update Odoo enterprise", "git -C odoo/enterprise pull"),
        plain("Create addons directory", "mkdir -p addons-${project_upper}"),
        CommandSpec {
            title: "Create the project scaffold".to_string(),
            command: "odoo scaffold --project-name ${project} --project-directory addons-${project_upper} --version ${version}"
                .to_string(),
            environments: BTreeMap::from([("ODOO_STAGE".to_string(), "${env}".to_string())]),
        },
        plain("Init new database", "odoo init --force"),
        plain("Change admin and master password", "odoo protect --force"),
    ]
}

// ── Lookups ──────────────────────────────────────────────────────────────────

impl RunbotConfig {
    #[must_use]
    pub fn project(&self, name: &str) -> Option<&ProjectConfig> {
        self.projects.get(name)
    }

    /// Base URL for a project; unknown projects resolve to an empty base.
    #[must_use]
    pub fn project_url(&self, name: &str) -> &str {
        self.projects.get(name).map_or("", |p| p.url.as_str())
    }

    /// # Errors
    ///
    /// Returns `ConfigError::UnknownApplication` when no entry exists.
    pub fn application(&self, name: &str) -> Result<&ApplicationConfig, ConfigError> {
        self.applications
            .get(name)
            .ok_or_else(|| ConfigError::UnknownApplication(name.to_string()))
    }

    /// Image alias for an application version.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownApplication` or
    /// `ConfigError::UnknownVersion`.
    pub fn image_alias(&self, app: &str, version: &str) -> Result<&str, ConfigError> {
        self.application(app)?
            .versions
            .get(version)
            .map(|v| v.image_alias.as_str())
            .ok_or_else(|| ConfigError::UnknownVersion {
                app: app.to_string(),
                version: version.to_string(),
            })
    }
}
