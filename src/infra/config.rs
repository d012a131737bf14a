//! YAML configuration store.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::config::RunbotConfig;

/// Loads `RunbotConfig` from a YAML file on disk, falling back to the
/// built-in defaults when no file exists.
pub struct YamlConfigStore;

impl YamlConfigStore {
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<RunbotConfig> {
        self.load_at(&self.path()?)
    }

    fn load_at(&self, path: &Path) -> Result<RunbotConfig> {
        if !path.exists() {
            return Ok(RunbotConfig::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    /// Configuration file path: `RUNBOT_CONFIG` when set, otherwise
    /// `~/.runbot/config.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn path(&self) -> Result<PathBuf> {
        if let Ok(val) = std::env::var("RUNBOT_CONFIG") {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".runbot").join("config.yaml"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = YamlConfigStore
            .load_at(&dir.path().join("absent.yaml"))
            .expect("load");
        assert_eq!(cfg.default_project, "runbot");
    }

    #[test]
    fn file_overrides_are_applied() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "default_project: demo\n").expect("write");
        let cfg = YamlConfigStore.load_at(&path).expect("load");
        assert_eq!(cfg.default_project, "demo");
        // Untouched sections keep their defaults.
        assert_eq!(cfg.proxy_instance, "proxy");
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, ":[broken").expect("write");
        assert!(YamlConfigStore.load_at(&path).is_err());
    }
}
