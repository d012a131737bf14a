//! Effective project / environment / application resolution.
//!
//! Every resolver applies the same precedence: explicit argument, then the
//! stored or project-level default, then the global default. Empty strings
//! count as absent so CLI defaults can pass through unchanged.

fn pick(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Resolve the project an operation targets.
#[must_use]
pub fn resolve_project(
    explicit: Option<&str>,
    stored_default: Option<&str>,
    global_default: &str,
) -> String {
    pick(explicit)
        .or_else(|| pick(stored_default))
        .unwrap_or(global_default)
        .to_string()
}

/// Resolve the environment an operation applies.
#[must_use]
pub fn resolve_environment(
    explicit: Option<&str>,
    project_default: Option<&str>,
    global_default: &str,
) -> String {
    pick(explicit)
        .or_else(|| pick(project_default))
        .unwrap_or(global_default)
        .to_string()
}

/// Resolve the application an operation installs or manages.
#[must_use]
pub fn resolve_application(
    explicit: Option<&str>,
    project_default: Option<&str>,
    global_default: &str,
) -> String {
    pick(explicit)
        .or_else(|| pick(project_default))
        .unwrap_or(global_default)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_always_wins() {
        assert_eq!(resolve_project(Some("demo"), Some("stored"), "global"), "demo");
        assert_eq!(resolve_environment(Some("staging"), Some("demo"), "dev"), "staging");
        assert_eq!(resolve_application(Some("shop"), Some("crm"), "odoo"), "shop");
    }

    #[test]
    fn stored_default_beats_global() {
        assert_eq!(resolve_project(None, Some("stored"), "global"), "stored");
        assert_eq!(resolve_project(Some(""), Some("stored"), "global"), "stored");
    }

    #[test]
    fn global_default_is_the_last_resort() {
        assert_eq!(resolve_project(None, None, "global"), "global");
        assert_eq!(resolve_project(Some(""), Some(""), "global"), "global");
        assert_eq!(resolve_environment(None, None, "dev"), "dev");
        assert_eq!(resolve_application(None, None, "odoo"), "odoo");
    }

    #[test]
    fn project_default_beats_global() {
        assert_eq!(resolve_environment(None, Some("demo"), "dev"), "demo");
        assert_eq!(resolve_application(None, Some("crm"), "odoo"), "crm");
    }
}
