//! Post-creation command execution inside an instance.

use std::collections::BTreeMap;

use anyhow::{Context, Result};

use crate::application::ports::{ExecUser, InstanceExecutor, ProgressReporter};
use crate::application::services::check_exec;
use crate::domain::config::AppUser;
use crate::domain::template::{self, CommandSpec};

pub(crate) fn exec_user(user: &AppUser) -> ExecUser {
    ExecUser {
        uid: user.uid,
        cwd: user.home.clone(),
    }
}

/// Run a command set inside `container`, in declared order, as the
/// application's configured user.
///
/// The whole set is expanded before the first command runs: an unbound
/// placeholder aborts with nothing executed, leaving the instance as it
/// was. A non-zero exit code or a non-empty error stream from any command
/// aborts the remainder — no rollback of already-run commands.
///
/// # Errors
///
/// Returns `TemplateError` for expansion failures and `ProvisionError`
/// for failed commands.
pub async fn run_command_set(
    hv: &impl InstanceExecutor,
    reporter: &impl ProgressReporter,
    project: &str,
    container: &str,
    user: &AppUser,
    set: &[CommandSpec],
    bindings: &BTreeMap<String, String>,
) -> Result<()> {
    let commands = template::expand_command_set(set, bindings)?;
    let user = exec_user(user);
    for command in &commands {
        reporter.step(&command.title);
        let argv: Vec<&str> = command.argv.iter().map(String::as_str).collect();
        let output = hv
            .exec(project, container, &argv, &user, &command.environments)
            .await
            .with_context(|| format!("running '{}' in {container}", command.title))?;
        check_exec(&command.title, &output)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::application::ports::InstanceInspector;
    use crate::application::services::test_support::{FakeFleet, ReporterStub};
    use crate::domain::error::TemplateError;
    use crate::domain::instance::InstanceStatus;

    fn user() -> AppUser {
        AppUser {
            name: "odoo".to_string(),
            uid: Some(4001),
            home: Some("/opt/local/odoo".to_string()),
        }
    }

    fn command(title: &str, command: &str) -> CommandSpec {
        CommandSpec {
            title: title.to_string(),
            command: command.to_string(),
            environments: BTreeMap::new(),
        }
    }

    fn bindings() -> BTreeMap<String, String> {
        BTreeMap::from([("project".to_string(), "runbots".to_string())])
    }

    #[tokio::test]
    async fn commands_run_in_declared_order_as_the_app_user() {
        let fleet =
            FakeFleet::new().with_instance("runbots", "runbots-demo1", InstanceStatus::Running);
        run_command_set(
            &fleet,
            &ReporterStub,
            "runbots",
            "runbots-demo1",
            &user(),
            &[
                command("first", "git -C odoo/community pull"),
                command("second", "mkdir -p addons-${project}"),
            ],
            &bindings(),
        )
        .await
        .expect("run");
        let calls = fleet.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].contains("git -C odoo/community pull"));
        assert!(calls[0].contains("uid=4001"));
        assert!(calls[1].contains("mkdir -p addons-runbots"));
    }

    #[tokio::test]
    async fn unbound_placeholder_aborts_before_any_command() {
        let fleet =
            FakeFleet::new().with_instance("runbots", "runbots-demo1", InstanceStatus::Running);
        let err = run_command_set(
            &fleet,
            &ReporterStub,
            "runbots",
            "runbots-demo1",
            &user(),
            &[
                command("fine", "true"),
                command("broken", "echo ${missing}"),
            ],
            &bindings(),
        )
        .await
        .expect_err("unbound");
        assert!(err.downcast_ref::<TemplateError>().is_some());
        assert!(
            fleet.calls.borrow().is_empty(),
            "nothing may execute when expansion fails"
        );
        // The instance itself is untouched.
        let record = fleet.get("runbots", "runbots-demo1").await.expect("get").expect("record");
        assert_eq!(record.status, InstanceStatus::Running);
    }

    #[tokio::test]
    async fn a_failing_command_aborts_the_remainder() {
        let fleet =
            FakeFleet::new().with_instance("runbots", "runbots-demo1", InstanceStatus::Running);
        let err = run_command_set(
            &fleet,
            &ReporterStub,
            "runbots",
            "runbots-demo1",
            &user(),
            &[
                command("breaks", "false"),
                command("never runs", "true"),
            ],
            &bindings(),
        )
        .await
        .expect_err("failure");
        assert!(err.to_string().contains("breaks"), "got: {err}");
        assert_eq!(fleet.calls.borrow().len(), 1, "the sequence stops at the failure");
    }
}
