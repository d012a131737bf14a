//! Per-user session defaults (`~/.runbot/session.json`).
//!
//! Atomic write via temp file + rename so a crash never leaves a
//! half-written session behind.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::application::ports::SessionStore;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct SessionState {
    default_project: Option<String>,
}

/// Session file manager — implements `SessionStore` for the infra layer.
pub struct SessionManager {
    path: PathBuf,
}

impl SessionManager {
    /// Create a session manager using the default path
    /// (`~/.runbot/session.json`).
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(Self::with_path(home.join(".runbot").join("session.json")))
    }

    /// Create a session manager with an explicit path (used in tests).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> Result<SessionState> {
        if !self.path.exists() {
            return Ok(SessionState::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading session file {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parsing session file {}", self.path.display()))
    }

    fn save(&self, state: &SessionState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(state).context("serializing session")?;

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, &content)
            .with_context(|| format!("writing temp file {}", temp_path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("setting permissions on {}", temp_path.display()))?;
        }

        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("finalizing session file {}", self.path.display()))?;
        Ok(())
    }
}

impl SessionStore for SessionManager {
    fn default_project(&self) -> Result<Option<String>> {
        Ok(self.load()?.default_project)
    }

    fn set_default_project(&self, project: &str) -> Result<()> {
        let mut state = self.load()?;
        state.default_project = Some(project.to_string());
        self.save(&state)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_means_no_stored_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mgr = SessionManager::with_path(dir.path().join("session.json"));
        assert_eq!(mgr.default_project().expect("load"), None);
    }

    #[test]
    fn stored_default_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mgr = SessionManager::with_path(dir.path().join("session.json"));
        mgr.set_default_project("demo").expect("save");
        assert_eq!(mgr.default_project().expect("load").as_deref(), Some("demo"));
    }

    #[test]
    fn overwrites_keep_the_latest_value() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mgr = SessionManager::with_path(dir.path().join("session.json"));
        mgr.set_default_project("runbot").expect("save");
        mgr.set_default_project("demo").expect("save");
        assert_eq!(mgr.default_project().expect("load").as_deref(), Some("demo"));
    }

    #[test]
    fn corrupt_session_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").expect("write");
        let mgr = SessionManager::with_path(path);
        assert!(mgr.default_project().is_err());
    }
}
