//! Canonical instance names, slugs, and public URLs.
//!
//! Pure functions only — no I/O, no failure modes beyond empty output for
//! empty input.

/// Lower-case, URL-safe slug: dots become dashes, anything outside
/// `[a-z0-9]` folds to a dash, runs collapse, and edges are trimmed.
#[must_use]
pub fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut pending_dash = false;
    for ch in raw.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(ch);
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Hypervisor-legal instance name for a runbot.
///
/// Non-`default` projects are prefixed (`project-name`): the hypervisor
/// resolves instance names on an internal DNS shared across projects, so
/// two projects cannot hold the same bare name. A leading digit gets an
/// `o` prefix — the hypervisor rejects names starting with a digit.
#[must_use]
pub fn canonical_name(name: &str, project: &str) -> String {
    let joined = if project.is_empty() || project == "default" {
        name.to_string()
    } else {
        format!("{project}-{name}")
    };
    let mut canonical = slugify(&joined);
    if canonical
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit())
    {
        canonical.insert(0, 'o');
    }
    canonical
}

/// Runbot name with the project prefix stripped, as shown to users.
#[must_use]
pub fn short_name<'a>(canonical: &'a str, project: &str) -> &'a str {
    if project.is_empty() || project == "default" {
        return canonical;
    }
    canonical
        .strip_prefix(project)
        .and_then(|rest| rest.strip_prefix('-'))
        .unwrap_or(canonical)
}

/// Public URL for a runbot.
///
/// Root runbots take the project base URL itself; otherwise the slug (or
/// the slugified name when no slug is given) becomes a subdomain of the
/// project base.
#[must_use]
pub fn public_url(name: &str, slug: &str, project_url: &str, root: bool) -> String {
    if root {
        return format!("https://{project_url}");
    }
    let mut prefix = slugify(slug);
    if prefix.is_empty() {
        prefix = slugify(name);
    }
    format!("https://{prefix}.{project_url}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn slugify_lowercases_and_folds_dots() {
        assert_eq!(slugify("Demo.15"), "demo-15");
        assert_eq!(slugify("My Runbot!"), "my-runbot");
        assert_eq!(slugify("--a--b--"), "a-b");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn canonical_name_prefixes_non_default_projects() {
        assert_eq!(canonical_name("demo1", "runbots"), "runbots-demo1");
        assert_eq!(canonical_name("demo1", "default"), "demo1");
        assert_eq!(canonical_name("demo1", ""), "demo1");
    }

    #[test]
    fn canonical_name_escapes_leading_digit() {
        assert_eq!(canonical_name("15-demo", ""), "o15-demo");
        assert_eq!(canonical_name("15-demo", "default"), "o15-demo");
        // The project prefix already guards the leading digit.
        assert_eq!(canonical_name("15-demo", "runbots"), "runbots-15-demo");
    }

    #[test]
    fn short_name_strips_the_prefix_once() {
        assert_eq!(short_name("runbots-demo1", "runbots"), "demo1");
        assert_eq!(short_name("runbots-demo1", "default"), "runbots-demo1");
        assert_eq!(short_name("other-demo1", "runbots"), "other-demo1");
    }

    #[test]
    fn public_url_prefers_slug_and_falls_back_to_name() {
        assert_eq!(
            public_url("demo1", "trial", "runbots.example.com", false),
            "https://trial.runbots.example.com"
        );
        assert_eq!(
            public_url("demo1", "", "runbots.example.com", false),
            "https://demo1.runbots.example.com"
        );
        assert_eq!(
            public_url("demo1", "trial", "runbots.example.com", true),
            "https://runbots.example.com"
        );
    }

    proptest! {
        #[test]
        fn canonical_names_stay_in_the_slug_alphabet(name in "\\PC{0,40}", project in "[a-z][a-z0-9]{0,12}") {
            let canonical = canonical_name(&name, &project);
            prop_assert!(canonical.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }

        #[test]
        fn canonical_names_never_start_with_a_digit(name in "\\PC{0,40}", project in "[a-z][a-z0-9]{0,12}") {
            let canonical = canonical_name(&name, &project);
            prop_assert!(!canonical.chars().next().is_some_and(|c| c.is_ascii_digit()));
        }

        #[test]
        fn non_default_projects_always_prefix(name in "[a-zA-Z][a-zA-Z0-9. ]{0,20}", project in "[a-z][a-z0-9]{0,12}") {
            prop_assume!(project != "default");
            let canonical = canonical_name(&name, &project);
            let expected_prefix = format!("{}-", slugify(&project));
            prop_assert!(canonical.starts_with(&expected_prefix));
        }

        #[test]
        fn slugs_are_idempotent(raw in "\\PC{0,40}") {
            let once = slugify(&raw);
            prop_assert_eq!(slugify(&once), once);
        }
    }
}
