//! Post-creation command sets and `${var}` expansion.
//!
//! A command set is an ordered list of typed records; expansion is a pure
//! function over an explicit binding map, validated for the whole set
//! before the caller runs a single command.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::error::TemplateError;

/// One provisioning command. `title`, `command`, and every value in
/// `environments` may reference `${var}` placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandSpec {
    pub title: String,
    pub command: String,
    #[serde(default)]
    pub environments: BTreeMap<String, String>,
}

/// A fully expanded command, ready to execute inside an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedCommand {
    pub title: String,
    pub argv: Vec<String>,
    pub environments: BTreeMap<String, String>,
}

/// Expand `${var}` placeholders in `template` against `bindings`.
///
/// `$$` yields a literal `$`; a bare `$` without braces is kept as-is so
/// shell variables survive untouched.
///
/// # Errors
///
/// Returns `TemplateError::UnboundVariable` for a placeholder with no
/// binding and `TemplateError::Unterminated` for an unclosed `${`.
pub fn expand(template: &str, bindings: &BTreeMap<String, String>) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        if let Some(stripped) = after.strip_prefix('$') {
            out.push('$');
            rest = stripped;
        } else if let Some(body) = after.strip_prefix('{') {
            let Some(end) = body.find('}') else {
                return Err(TemplateError::Unterminated(template.to_string()));
            };
            let key = &body[..end];
            let value = bindings.get(key).ok_or_else(|| TemplateError::UnboundVariable {
                placeholder: key.to_string(),
                within: template.to_string(),
            })?;
            out.push_str(value);
            rest = &body[end + 1..];
        } else {
            out.push('$');
            rest = after;
        }
    }
    out.push_str(rest);
    Ok(out)
}

/// Expand a whole command set against `bindings`.
///
/// The set is validated as a unit: any unbound placeholder anywhere fails
/// the expansion before the caller executes anything.
///
/// # Errors
///
/// Propagates the first [`TemplateError`] encountered, in declaration order.
pub fn expand_command_set(
    set: &[CommandSpec],
    bindings: &BTreeMap<String, String>,
) -> Result<Vec<ExpandedCommand>, TemplateError> {
    set.iter()
        .map(|spec| {
            let title = expand(&spec.title, bindings)?;
            let command = expand(&spec.command, bindings)?;
            let environments = spec
                .environments
                .iter()
                .map(|(key, value)| Ok((key.clone(), expand(value, bindings)?)))
                .collect::<Result<BTreeMap<_, _>, TemplateError>>()?;
            Ok(ExpandedCommand {
                title,
                argv: command.split_whitespace().map(ToString::to_string).collect(),
                environments,
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn bindings(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn expands_placeholders() {
        let out = expand("mkdir -p addons-${project_upper}", &bindings(&[("project_upper", "DEMO")]));
        assert_eq!(out.unwrap(), "mkdir -p addons-DEMO");
    }

    #[test]
    fn double_dollar_escapes_and_bare_dollar_survives() {
        let out = expand("echo $$HOME is $HOME", &bindings(&[]));
        assert_eq!(out.unwrap(), "echo $HOME is $HOME");
    }

    #[test]
    fn unbound_placeholder_is_an_error() {
        let err = expand("git checkout ${missing}", &bindings(&[])).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnboundVariable {
                placeholder: "missing".to_string(),
                within: "git checkout ${missing}".to_string(),
            }
        );
    }

    #[test]
    fn unterminated_placeholder_is_an_error() {
        let err = expand("echo ${oops", &bindings(&[])).unwrap_err();
        assert_eq!(err, TemplateError::Unterminated("echo ${oops".to_string()));
    }

    #[test]
    fn command_set_expands_titles_commands_and_environments() {
        let set = vec![CommandSpec {
            title: "Scaffold ${project}".to_string(),
            command: "odoo scaffold --project-name ${project}".to_string(),
            environments: bindings(&[("ODOO_STAGE", "${env}")]),
        }];
        let expanded = expand_command_set(&set, &bindings(&[("project", "demo"), ("env", "dev")])).unwrap();
        assert_eq!(expanded[0].title, "Scaffold demo");
        assert_eq!(
            expanded[0].argv,
            ["odoo", "scaffold", "--project-name", "demo"]
        );
        assert_eq!(expanded[0].environments["ODOO_STAGE"], "dev");
    }

    #[test]
    fn one_unbound_placeholder_fails_the_whole_set() {
        let set = vec![
            CommandSpec {
                title: "ok".to_string(),
                command: "true".to_string(),
                environments: BTreeMap::new(),
            },
            CommandSpec {
                title: "broken".to_string(),
                command: "echo ${missing}".to_string(),
                environments: BTreeMap::new(),
            },
        ];
        assert!(expand_command_set(&set, &bindings(&[])).is_err());
    }
}
