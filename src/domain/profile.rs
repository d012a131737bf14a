//! Profile attachment ordering.

use crate::domain::config::ApplicationConfig;

/// Ordered profile list for a new or re-profiled instance.
///
/// The environment profile comes first: when several attached profiles
/// define the same limit, the hypervisor honours the first attachment,
/// so environment limits take priority over application profiles.
#[must_use]
pub fn resolve_profiles(environment: &str, app: &ApplicationConfig) -> Vec<String> {
    let mut profiles = Vec::with_capacity(1 + app.required_profiles.len());
    profiles.push(environment.to_string());
    profiles.extend(app.required_profiles.iter().cloned());
    profiles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_always_comes_first() {
        let app = ApplicationConfig {
            required_profiles: vec!["default".to_string(), "odoo".to_string()],
            ..ApplicationConfig::default()
        };
        assert_eq!(resolve_profiles("staging", &app), ["staging", "default", "odoo"]);
    }

    #[test]
    fn no_required_profiles_yields_environment_only() {
        let app = ApplicationConfig::default();
        assert_eq!(resolve_profiles("dev", &app), ["dev"]);
    }
}
