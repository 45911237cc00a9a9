//! Command dispatch: one action per invocation

use std::path::Path;

use tracing::{debug, instrument};

use crate::application::selection::{plan_selection, select_index};
use crate::application::ApplicationError;
use crate::cli::args::Cli;
use crate::cli::error::{CliError, CliResult};
use crate::cli::{output, report};
use crate::domain::{Config, Plan};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::EntryKind;
use crate::util::path::expand_path;

const DELETE_PROMPT: &str = "Select the deployment to delete :-";
const PLAN_PROMPT: &str = "Please select plan from the list";
const TARGET_REQUIRED: &str = "Either provide work directory or repository url to deploy";

/// Run the single action selected by `cli`.
///
/// Priority: inspect, delete, then a deploy of exactly one of
/// `--workdir` / `--addrepo`.
pub fn execute_command(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    if cli.inspect {
        return cmd_inspect(cli, container);
    }
    if cli.delete {
        return cmd_delete(cli, container);
    }

    let (workdir, addrepo) = match (cli.workdir(), cli.addrepo()) {
        (Some(_), Some(_)) | (None, None) => {
            return Err(CliError::Usage(TARGET_REQUIRED.to_string()))
        }
        targets => targets,
    };

    let plan = resolve_plan(cli, container)?;
    let config = acquire_config(cli, container)?;

    if let Some(url) = addrepo {
        return cmd_deploy_repository(cli, container, &config, &plan, url);
    }
    if let Some(path) = workdir {
        return cmd_deploy_workdir(cli, container, &config, &plan, &expand_path(path));
    }
    Ok(())
}

fn acquire_config(cli: &Cli, container: &ServiceContainer) -> CliResult<Config> {
    Ok(container.startup_service().startup(&cli.login_args())?)
}

fn resolve_plan(cli: &Cli, container: &ServiceContainer) -> CliResult<Plan> {
    match cli.plan() {
        Some(name) => Ok(Plan::new(name)?),
        None => Ok(plan_selection(container.selector.as_ref(), PLAN_PROMPT)?),
    }
}

#[instrument(skip_all)]
fn cmd_inspect(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    let config = acquire_config(cli, container)?;
    let deployments = container.deployment_service().list(&config)?;
    report::print_report(&deployments, &config.base_url);
    Ok(())
}

#[instrument(skip_all)]
fn cmd_delete(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    let config = acquire_config(cli, container)?;
    let service = container.deployment_service();

    let ready = service.list_ready(&config)?;
    if ready.is_empty() {
        return Err(ApplicationError::NoDeployments.into());
    }

    let labels: Vec<String> = ready.iter().map(|d| d.label()).collect();
    let index = select_index(container.selector.as_ref(), &labels, DELETE_PROMPT)?;
    let deployment = &ready[index];
    debug!("delete: {:?}", deployment);

    service.delete(&config, deployment)?;
    output::success(&format!("Deleted {}", labels[index]));
    Ok(())
}

#[instrument(skip(cli, container, config))]
fn cmd_deploy_repository(
    cli: &Cli,
    container: &ServiceContainer,
    config: &Config,
    plan: &Plan,
    url: &str,
) -> CliResult<()> {
    let name = container.deploy_service().deploy_from_repository(
        config,
        plan,
        url,
        &cli.deploy_options(),
    )?;
    output::success(&format!("Deployed {url} as {name}"));
    Ok(())
}

#[instrument(skip(cli, container, config))]
fn cmd_deploy_workdir(
    cli: &Cli,
    container: &ServiceContainer,
    config: &Config,
    plan: &Plan,
    path: &Path,
) -> CliResult<()> {
    match container.fs.entry_kind(path) {
        Ok(EntryKind::Directory) => {}
        Ok(_) => return Err(CliError::RootPathNotDirectory(path.to_path_buf())),
        Err(e) => {
            debug!("stat {}: {e}", path.display());
            return Err(CliError::RootPathNotFound(path.to_path_buf()));
        }
    }

    let name = container.deploy_service().deploy_package(
        path,
        config,
        plan,
        &cli.deploy_options(),
    )?;
    output::success(&format!("Deployed {} as {name}", path.display()));
    Ok(())
}
