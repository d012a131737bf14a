//! Reverse-proxy route management.
//!
//! Routes are per-container Traefik artifacts on the proxy instance in the
//! `default` project. This module never touches the proxy configuration
//! directly — it drives the proxy instance's command surface through the
//! hypervisor executor.

use std::collections::BTreeMap;

use anyhow::{Context, Result};

use crate::application::ports::{ExecUser, InstanceExecutor, ProgressReporter};
use crate::application::services::check_exec;
use crate::domain::naming;

/// Traefik drop-in directory on the proxy instance.
const ROUTE_CONF_DIR: &str = "/etc/traefik/conf.d";

fn artifact_path(container: &str) -> String {
    format!("{ROUTE_CONF_DIR}/{container}_odoo.toml")
}

/// Create the route mapping `slug.<project-url>` to `container`.
///
/// An empty slug falls back to the canonical name with the project prefix
/// stripped. The caller must have deleted any prior route for the same
/// canonical name — no deduplication happens here.
///
/// # Errors
///
/// Returns an error if the proxy instance is unreachable or the add-route
/// command fails.
pub async fn set_route(
    hv: &impl InstanceExecutor,
    proxy: &str,
    project: &str,
    project_url: &str,
    container: &str,
    slug: &str,
) -> Result<()> {
    let slug = if slug.is_empty() {
        naming::short_name(container, project).to_string()
    } else {
        slug.to_string()
    };
    let argv = [
        "add-odoo-container.sh",
        "-c",
        container,
        "-h",
        project_url,
        "-s",
        &slug,
    ];
    let output = hv
        .exec("default", proxy, &argv, &ExecUser::default(), &BTreeMap::new())
        .await
        .with_context(|| format!("adding the route for {container}"))?;
    check_exec("add-odoo-container.sh", &output)?;
    Ok(())
}

/// Remove the route artifact for `container`.
///
/// A missing artifact is a logged no-op (`rm -f`), so a stale or
/// already-deleted route never blocks a lifecycle operation.
///
/// # Errors
///
/// Returns an error if the proxy instance is unreachable.
pub async fn delete_route(
    hv: &impl InstanceExecutor,
    reporter: &impl ProgressReporter,
    proxy: &str,
    container: &str,
) -> Result<()> {
    let path = artifact_path(container);
    let output = hv
        .exec(
            "default",
            proxy,
            &["rm", "-f", &path],
            &ExecUser::default(),
            &BTreeMap::new(),
        )
        .await
        .with_context(|| format!("deleting the route for {container}"))?;
    check_exec("rm", &output)?;
    reporter.success(&format!("route removed for {container}"));
    Ok(())
}

/// Read the route artifact for `container`.
///
/// # Errors
///
/// Returns an error when no route exists for the canonical name.
pub async fn show_route(
    hv: &impl InstanceExecutor,
    proxy: &str,
    container: &str,
) -> Result<String> {
    let path = artifact_path(container);
    let output = hv
        .exec(
            "default",
            proxy,
            &["cat", &path],
            &ExecUser::default(),
            &BTreeMap::new(),
        )
        .await
        .with_context(|| format!("reading the route for {container}"))?;
    if !output.status.success() {
        anyhow::bail!("no route for {container}");
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// List the proxy's route configuration directory.
///
/// # Errors
///
/// Returns an error if the proxy instance is unreachable.
pub async fn list_routes(hv: &impl InstanceExecutor, proxy: &str) -> Result<String> {
    let output = hv
        .exec(
            "default",
            proxy,
            &["ls", "-l", ROUTE_CONF_DIR],
            &ExecUser::default(),
            &BTreeMap::new(),
        )
        .await
        .context("listing routes")?;
    check_exec("ls", &output)?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{FakeFleet, ReporterStub};

    #[tokio::test]
    async fn set_then_delete_leaves_no_route_entry() {
        let fleet = FakeFleet::new();
        set_route(&fleet, "proxy", "runbots", "runbots.example.com", "runbots-demo1", "demo1")
            .await
            .expect("set");
        assert!(
            list_routes(&fleet, "proxy")
                .await
                .expect("list")
                .contains("runbots-demo1_odoo.toml")
        );
        delete_route(&fleet, &ReporterStub, "proxy", "runbots-demo1")
            .await
            .expect("delete");
        assert!(fleet.route_files.borrow().is_empty());
    }

    #[tokio::test]
    async fn empty_slug_falls_back_to_the_short_name() {
        let fleet = FakeFleet::new();
        set_route(&fleet, "proxy", "runbots", "runbots.example.com", "runbots-demo1", "")
            .await
            .expect("set");
        let calls = fleet.calls.borrow();
        assert!(
            calls[0].contains("-s demo1"),
            "slug should default to the stripped name: {}",
            calls[0]
        );
    }

    #[tokio::test]
    async fn deleting_a_missing_route_is_a_no_op() {
        let fleet = FakeFleet::new();
        delete_route(&fleet, &ReporterStub, "proxy", "runbots-gone")
            .await
            .expect("delete");
    }

    #[tokio::test]
    async fn show_route_errors_when_absent() {
        let fleet = FakeFleet::new();
        let err = show_route(&fleet, "proxy", "runbots-gone").await.expect_err("absent");
        assert!(err.to_string().contains("no route for runbots-gone"));
    }

    #[tokio::test]
    async fn show_route_reads_the_artifact() {
        let fleet = FakeFleet::new().with_route("runbots-demo1");
        let body = show_route(&fleet, "proxy", "runbots-demo1").await.expect("show");
        assert!(body.contains("[http.routers]"));
    }
}
