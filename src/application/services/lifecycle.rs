//! Lifecycle orchestrator: create, copy, deploy, move, rename,
//! set-environment, delete, start, stop, restart, list.
//!
//! Every operation is one linear sequence of blocking hypervisor calls
//! with the ordering the routing and naming invariants require (stop
//! before rename, create before routing). Nothing is retried; a failed
//! step halts the sequence and surfaces the operation and canonical name
//! in the error context. Imports only from `crate::domain` and
//! `crate::application`.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::application::ports::{CopySpec, CreateSpec, Hypervisor, InstanceInspector, ProgressReporter};
use crate::application::services::{check_exec, provision, routes};
use crate::domain::config::RunbotConfig;
use crate::domain::error::{ConfigError, FleetError};
use crate::domain::{environment, naming, profile};

// ── Requests and outcomes ────────────────────────────────────────────────────

pub struct CreateRequest<'a> {
    pub name: &'a str,
    pub project: &'a str,
    pub env: &'a str,
    pub app: &'a str,
    pub image: Option<&'a str>,
    pub version: Option<&'a str>,
    pub slug: &'a str,
    pub root: bool,
    pub with_post_commands: bool,
}

#[derive(Debug)]
pub struct CreateOutcome {
    pub name: String,
    pub canonical: String,
    pub url: String,
    pub image: String,
    pub environment: String,
    pub profiles: Vec<String>,
    pub version: Option<String>,
}

pub struct CopyRequest<'a> {
    pub name: &'a str,
    pub target_name: &'a str,
    pub project: &'a str,
    pub slug: &'a str,
    pub env: &'a str,
    pub app: &'a str,
}

#[derive(Debug)]
pub struct CopyOutcome {
    pub source: String,
    pub target: String,
    pub url: String,
}

pub struct DeployRequest<'a> {
    pub name: &'a str,
    pub branch: &'a str,
    pub source_name: &'a str,
    pub project: &'a str,
    pub slug: &'a str,
    pub update_all: bool,
    pub env: &'a str,
    pub app: &'a str,
}

pub struct MoveRequest<'a> {
    pub name: &'a str,
    pub project: &'a str,
    pub target_project: &'a str,
    pub slug: &'a str,
}

#[derive(Debug)]
pub struct MoveOutcome {
    pub source: String,
    pub target: String,
    pub url: String,
}

/// One row of the project listing.
pub struct InstanceSummary {
    pub name: String,
    pub description: String,
    pub status: String,
    pub status_code: i64,
    pub url: String,
    pub environment: Option<String>,
    pub memory_usage: Option<u64>,
    pub created_at: Option<DateTime<Utc>>,
    pub profiles: Vec<String>,
}

// ── Shared pre-checks ────────────────────────────────────────────────────────

/// Validate a project against the hypervisor's registry.
///
/// # Errors
///
/// Returns `ConfigError::UnknownProject` for unregistered projects.
pub async fn ensure_project(hv: &impl InstanceInspector, project: &str) -> Result<()> {
    if project == "default" {
        return Ok(());
    }
    let projects = hv
        .list_projects()
        .await
        .context("listing hypervisor projects")?;
    if projects.iter().any(|p| p == project) {
        Ok(())
    } else {
        Err(ConfigError::UnknownProject(project.to_string()).into())
    }
}

/// Resolve a runbot name to its canonical name, failing when no such
/// instance exists.
///
/// # Errors
///
/// Returns `FleetError::NotFound` when the instance is absent.
pub async fn ensure_exists(
    hv: &impl InstanceInspector,
    project: &str,
    name: &str,
) -> Result<String> {
    let canonical = naming::canonical_name(name, project);
    if hv.exists(project, &canonical).await? {
        Ok(canonical)
    } else {
        Err(FleetError::NotFound(canonical).into())
    }
}

fn provision_bindings(
    project: &str,
    slug: &str,
    name: &str,
    version: &str,
    env: &str,
    project_url: &str,
) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("project".to_string(), project.to_string()),
        ("project_upper".to_string(), project.to_uppercase()),
        ("slug".to_string(), slug.to_string()),
        ("name".to_string(), name.to_string()),
        ("version".to_string(), version.to_string()),
        ("env".to_string(), env.to_string()),
        ("project_url".to_string(), project_url.to_string()),
        ("container_url".to_string(), format!("{slug}.{project_url}")),
    ])
}

// ── Operations ───────────────────────────────────────────────────────────────

/// Create a runbot with its route.
///
/// Ordering: resolve and pre-check everything, then hypervisor create,
/// start, route, and finally the post-creation command set. A hypervisor
/// failure aborts with no route cleanup — the route only exists once the
/// instance started.
///
/// # Errors
///
/// Configuration and conflict errors surface before any mutation;
/// hypervisor, routing, and provisioning failures abort the remaining
/// steps.
pub async fn create(
    hv: &impl Hypervisor,
    cfg: &RunbotConfig,
    reporter: &impl ProgressReporter,
    req: &CreateRequest<'_>,
) -> Result<CreateOutcome> {
    environment::check_environment(req.env, &cfg.environments)?;
    let app = cfg.application(req.app)?;
    let image = match (req.image, req.version) {
        (Some(_), Some(_)) => return Err(ConfigError::ImageAndVersion.into()),
        (None, None) => return Err(ConfigError::ImageOrVersionRequired.into()),
        (Some(image), None) => image.to_string(),
        (None, Some(version)) => cfg.image_alias(req.app, version)?.to_string(),
    };
    ensure_project(hv, req.project).await?;

    let name = naming::slugify(req.name);
    let canonical = naming::canonical_name(&name, req.project);
    if hv.exists(req.project, &canonical).await? {
        return Err(FleetError::AlreadyExists(canonical).into());
    }
    if !hv.image_exists(&image).await? {
        return Err(ConfigError::UnknownImage(image).into());
    }

    let slug = if req.slug.is_empty() {
        name.clone()
    } else {
        naming::slugify(req.slug)
    };
    let profiles = profile::resolve_profiles(req.env, app);
    let project_url = cfg.project_url(req.project);
    let url = naming::public_url(&name, &slug, project_url, req.root);

    reporter.step(&format!("creating {canonical}, the operation can take a long time"));
    hv.create(&CreateSpec {
        project: req.project,
        name: &canonical,
        image: &image,
        profiles: &profiles,
    })
    .await
    .with_context(|| format!("creating {canonical}"))?;

    reporter.step(&format!("starting {canonical}"));
    hv.start(req.project, &canonical)
        .await
        .with_context(|| format!("starting {canonical}"))?;

    reporter.step("adding the route");
    routes::set_route(hv, &cfg.proxy_instance, req.project, project_url, &canonical, &slug).await?;

    if req.with_post_commands && !app.post_create_commands.is_empty() {
        let bindings = provision_bindings(
            req.project,
            &slug,
            &name,
            req.version.unwrap_or(""),
            req.env,
            project_url,
        );
        provision::run_command_set(
            hv,
            reporter,
            req.project,
            &canonical,
            &app.user,
            &app.post_create_commands,
            &bindings,
        )
        .await?;
    }

    Ok(CreateOutcome {
        name,
        canonical,
        url,
        image,
        environment: req.env.to_string(),
        profiles,
        version: req.version.map(ToString::to_string),
    })
}

/// Copy a runbot (storage-layer clone) and route the copy.
///
/// Source-absent and target-exists are pre-checked and reported before
/// any mutation.
///
/// # Errors
///
/// See `create`.
pub async fn copy(
    hv: &impl Hypervisor,
    cfg: &RunbotConfig,
    reporter: &impl ProgressReporter,
    req: &CopyRequest<'_>,
) -> Result<CopyOutcome> {
    environment::check_environment(req.env, &cfg.environments)?;
    let app = cfg.application(req.app)?;
    ensure_project(hv, req.project).await?;

    let source = naming::canonical_name(req.name, req.project);
    let target = naming::canonical_name(req.target_name, req.project);
    if !hv.exists(req.project, &source).await? {
        return Err(FleetError::NotFound(source).into());
    }
    if hv.exists(req.project, &target).await? {
        return Err(FleetError::AlreadyExists(target).into());
    }

    let slug = if req.slug.is_empty() {
        naming::slugify(req.target_name)
    } else {
        naming::slugify(req.slug)
    };
    let profiles = profile::resolve_profiles(req.env, app);

    reporter.step("creating the new instance...");
    hv.copy(&CopySpec {
        project: req.project,
        source: &source,
        target: &target,
        profiles: &profiles,
    })
    .await
    .with_context(|| format!("copying {source} to {target}"))?;

    reporter.step("starting the new instance...");
    hv.start(req.project, &target)
        .await
        .with_context(|| format!("starting {target}"))?;

    reporter.step("creating the route...");
    routes::set_route(
        hv,
        &cfg.proxy_instance,
        req.project,
        cfg.project_url(req.project),
        &target,
        &slug,
    )
    .await?;

    let url = naming::public_url(req.target_name, &slug, cfg.project_url(req.project), false);
    Ok(CopyOutcome { source, target, url })
}

/// Deploy a branch to a runbot, creating it from `source_name` when
/// absent, then running the in-instance update command.
///
/// Returns the update command's standard output.
///
/// # Errors
///
/// Returns `FleetError::NotFound` when the runbot is absent and no source
/// was given; update failures carry the in-instance exit code.
pub async fn deploy(
    hv: &impl Hypervisor,
    cfg: &RunbotConfig,
    reporter: &impl ProgressReporter,
    req: &DeployRequest<'_>,
) -> Result<String> {
    ensure_project(hv, req.project).await?;
    let canonical = naming::canonical_name(req.name, req.project);

    if !hv.exists(req.project, &canonical).await? {
        if req.source_name.is_empty() {
            return Err(FleetError::NotFound(canonical).into());
        }
        reporter.step(&format!(
            "runbot '{}' doesn't exist, creating it from '{}'",
            req.name, req.source_name
        ));
        copy(
            hv,
            cfg,
            reporter,
            &CopyRequest {
                name: req.source_name,
                target_name: req.name,
                project: req.project,
                slug: req.slug,
                env: req.env,
                app: req.app,
            },
        )
        .await?;
    }

    let app = cfg.application(req.app)?;
    let mut argv = vec!["odoo", "upgrade", "--force", "--branch", req.branch];
    if !req.update_all {
        argv.push("--auto");
    }

    reporter.step(&format!("deploying branch '{}' on {canonical}", req.branch));
    let output = hv
        .exec(
            req.project,
            &canonical,
            &argv,
            &provision::exec_user(&app.user),
            &BTreeMap::new(),
        )
        .await
        .with_context(|| format!("upgrading {canonical}"))?;
    check_exec("odoo upgrade", &output)?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Move a runbot to another project.
///
/// Step sequence, with the manual compensation each partial state needs —
/// there is no automatic rollback:
///
/// | step | state on failure | recovery |
/// |---|---|---|
/// | stop source | source stopped in place | `runbot start` |
/// | migrate | copy in target project under the old name | migrate back, or rename + re-route in place |
/// | rename | as above | rename manually, then fix routes |
/// | delete old route | renamed, no route | `runbot route set` |
/// | create new route | renamed, no route | `runbot route set` |
/// | start target | moved and routed, stopped | `runbot start -p <target>` |
///
/// # Errors
///
/// Pre-checks report missing sources and occupied targets before any
/// mutation; every step failure names the step and canonical names in
/// its context.
pub async fn relocate(
    hv: &impl Hypervisor,
    cfg: &RunbotConfig,
    reporter: &impl ProgressReporter,
    req: &MoveRequest<'_>,
) -> Result<MoveOutcome> {
    ensure_project(hv, req.project).await?;
    ensure_project(hv, req.target_project).await?;

    let source = naming::canonical_name(req.name, req.project);
    let target = naming::canonical_name(req.name, req.target_project);
    let record = hv
        .get(req.project, &source)
        .await?
        .ok_or_else(|| FleetError::NotFound(source.clone()))?;
    if hv.exists(req.target_project, &target).await? {
        return Err(FleetError::AlreadyExists(target).into());
    }

    let slug = if req.slug.is_empty() {
        naming::slugify(req.name)
    } else {
        naming::slugify(req.slug)
    };

    if record.status.is_running_like() {
        reporter.step(&format!("stopping {source}"));
        hv.stop(req.project, &source)
            .await
            .with_context(|| format!("stopping {source}"))?;
    }

    reporter.step(&format!(
        "moving '{}' to the project '{}', this can take some time",
        req.name, req.target_project
    ));
    hv.migrate(req.project, &source, req.target_project)
        .await
        .with_context(|| format!("migrating {source} to {}", req.target_project))?;

    // The migrated copy keeps the source name and may come back started.
    if let Some(moved) = hv.get(req.target_project, &source).await?
        && moved.status.is_running_like()
    {
        hv.stop(req.target_project, &source)
            .await
            .with_context(|| format!("stopping the migrated {source}"))?;
    }
    hv.rename(req.target_project, &source, &target)
        .await
        .with_context(|| format!("renaming {source} to {target}"))?;

    reporter.step("removing the old route");
    routes::delete_route(hv, reporter, &cfg.proxy_instance, &source).await?;
    reporter.step("creating the new route");
    routes::set_route(
        hv,
        &cfg.proxy_instance,
        req.target_project,
        cfg.project_url(req.target_project),
        &target,
        &slug,
    )
    .await?;

    reporter.step(&format!("starting {target}"));
    hv.start(req.target_project, &target)
        .await
        .with_context(|| format!("starting {target}"))?;

    let url = naming::public_url(req.name, &slug, cfg.project_url(req.target_project), false);
    Ok(MoveOutcome { source, target, url })
}

/// Rename a runbot within its project: stop, rename, start.
///
/// Routes are not touched — a route pointing at the old name is stale and
/// must be deleted explicitly. On failure the instance may be left
/// stopped under the old name.
///
/// # Errors
///
/// Missing instances and occupied target names are pre-checked.
pub async fn rename(
    hv: &impl Hypervisor,
    reporter: &impl ProgressReporter,
    project: &str,
    name: &str,
    new_name: &str,
) -> Result<String> {
    let canonical = naming::canonical_name(name, project);
    let new_canonical = naming::canonical_name(new_name, project);
    let record = hv
        .get(project, &canonical)
        .await?
        .ok_or_else(|| FleetError::NotFound(canonical.clone()))?;
    if hv.exists(project, &new_canonical).await? {
        return Err(FleetError::AlreadyExists(new_canonical).into());
    }

    if record.status.is_running_like() {
        reporter.step(&format!("stopping {canonical}"));
        hv.stop(project, &canonical)
            .await
            .with_context(|| format!("stopping {canonical}"))?;
    }
    hv.rename(project, &canonical, &new_canonical)
        .await
        .with_context(|| format!("renaming {canonical} to {new_canonical}"))?;

    reporter.step(&format!("starting {new_canonical}"));
    hv.start(project, &new_canonical)
        .await
        .with_context(|| format!("starting {new_canonical}"))?;
    Ok(new_canonical)
}

/// Replace a runbot's profile attachment for a new environment.
///
/// No restart is performed: profile changes that only apply at boot are
/// the caller's responsibility.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvironment` for environments outside the
/// closed set and `FleetError::NotFound` for missing instances.
pub async fn set_environment(
    hv: &impl Hypervisor,
    cfg: &RunbotConfig,
    project: &str,
    name: &str,
    env: &str,
    app: &str,
) -> Result<Vec<String>> {
    environment::check_environment(env, &cfg.environments)?;
    let app_cfg = cfg.application(app)?;
    let canonical = ensure_exists(hv, project, name).await?;
    let profiles = profile::resolve_profiles(env, app_cfg);
    hv.apply_profiles(project, &canonical, &profiles)
        .await
        .with_context(|| format!("updating profiles on {canonical}"))?;
    Ok(profiles)
}

/// Delete a runbot and its route, stopping it first when running-like.
///
/// The caller is responsible for confirmation; existence must be checked
/// (via `ensure_exists`) before prompting so a missing target never
/// prompts at all.
///
/// # Errors
///
/// Returns `FleetError::NotFound` when the instance is absent.
pub async fn delete(
    hv: &impl Hypervisor,
    cfg: &RunbotConfig,
    reporter: &impl ProgressReporter,
    project: &str,
    name: &str,
) -> Result<String> {
    let canonical = naming::canonical_name(name, project);
    let record = hv
        .get(project, &canonical)
        .await?
        .ok_or_else(|| FleetError::NotFound(canonical.clone()))?;

    if record.status.is_running_like() {
        reporter.step(&format!("stopping {name}"));
        hv.stop(project, &canonical)
            .await
            .with_context(|| format!("stopping {canonical}"))?;
    }
    hv.delete(project, &canonical)
        .await
        .with_context(|| format!("deleting {canonical}"))?;
    routes::delete_route(hv, reporter, &cfg.proxy_instance, &canonical).await?;
    Ok(canonical)
}

/// Start a runbot.
///
/// # Errors
///
/// Returns `FleetError::NotFound` when the instance is absent.
pub async fn start(hv: &impl Hypervisor, project: &str, name: &str) -> Result<String> {
    let canonical = ensure_exists(hv, project, name).await?;
    hv.start(project, &canonical)
        .await
        .with_context(|| format!("starting {canonical}"))?;
    Ok(canonical)
}

/// Stop a runbot.
///
/// # Errors
///
/// Returns `FleetError::NotFound` when the instance is absent.
pub async fn stop(hv: &impl Hypervisor, project: &str, name: &str) -> Result<String> {
    let canonical = ensure_exists(hv, project, name).await?;
    hv.stop(project, &canonical)
        .await
        .with_context(|| format!("stopping {canonical}"))?;
    Ok(canonical)
}

/// Restart a runbot.
///
/// # Errors
///
/// Returns `FleetError::NotFound` when the instance is absent.
pub async fn restart(hv: &impl Hypervisor, project: &str, name: &str) -> Result<String> {
    let canonical = ensure_exists(hv, project, name).await?;
    hv.restart(project, &canonical)
        .await
        .with_context(|| format!("restarting {canonical}"))?;
    Ok(canonical)
}

/// List the runbots of a project with their derived attributes.
///
/// # Errors
///
/// Returns an error if the hypervisor listing fails.
pub async fn list(
    hv: &impl Hypervisor,
    cfg: &RunbotConfig,
    project: &str,
) -> Result<Vec<InstanceSummary>> {
    let project_url = cfg.project_url(project);
    Ok(hv
        .list(project)
        .await?
        .into_iter()
        .map(|record| {
            let short = naming::short_name(&record.name, project).to_string();
            let environment = environment::from_profiles(&record.profiles, &cfg.environments)
                .map(ToString::to_string);
            InstanceSummary {
                url: format!("https://{short}.{project_url}"),
                environment,
                name: short,
                description: record.description,
                status: record.status.as_str().to_string(),
                status_code: record.status_code,
                memory_usage: record.memory_usage,
                created_at: record.created_at,
                profiles: record.profiles,
            }
        })
        .collect())
}

/// Re-run the post-creation command set on an existing runbot.
///
/// # Errors
///
/// Returns `FleetError::NotFound` when the instance is absent; expansion
/// and command failures propagate from the provisioning engine.
pub async fn run_post_create(
    hv: &impl Hypervisor,
    cfg: &RunbotConfig,
    reporter: &impl ProgressReporter,
    project: &str,
    name: &str,
    version: &str,
    env: &str,
    app: &str,
) -> Result<()> {
    environment::check_environment(env, &cfg.environments)?;
    let app_cfg = cfg.application(app)?;
    let canonical = ensure_exists(hv, project, name).await?;
    let slug = naming::slugify(name);
    let bindings =
        provision_bindings(project, &slug, &slug, version, env, cfg.project_url(project));
    provision::run_command_set(
        hv,
        reporter,
        project,
        &canonical,
        &app_cfg.user,
        &app_cfg.post_create_commands,
        &bindings,
    )
    .await
}
