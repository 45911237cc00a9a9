//! Creating deployments from a repository URL or a local work directory

use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info, instrument};

use crate::application::selection::list_selection;
use crate::application::services::PackageService;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    merge_env, parse_dotenv, Config, DeployRequest, DomainError, EnvVar, PackageUpload, Plan,
    ResourceType,
};
use crate::infrastructure::traits::{ApiConnector, FileSystem, Selector};

const BRANCH_PROMPT: &str = "Select branch :-";

/// Dotenv file in a work directory whose variables are passed to the deployment.
const DOTENV_FILE: &str = ".env";

/// Per-deploy options coming from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployOptions {
    /// Deployment name for package deploys; defaults to the directory name
    pub project_name: Option<String>,
    /// Explicit variables; they override a work directory's `.env`
    pub env: Vec<EnvVar>,
}

/// Runs the repository and package deploy flows.
pub struct DeployService {
    api: Arc<dyn ApiConnector>,
    selector: Arc<dyn Selector>,
    fs: Arc<dyn FileSystem>,
    packages: PackageService,
}

impl DeployService {
    pub fn new(
        api: Arc<dyn ApiConnector>,
        selector: Arc<dyn Selector>,
        fs: Arc<dyn FileSystem>,
        packages: PackageService,
    ) -> Self {
        Self {
            api,
            selector,
            fs,
            packages,
        }
    }

    /// Register `url` on the platform and deploy it. Returns the deployment name.
    ///
    /// A repository with several branches asks which one to deploy.
    #[instrument(skip(self, config, options))]
    pub fn deploy_from_repository(
        &self,
        config: &Config,
        plan: &Plan,
        url: &str,
        options: &DeployOptions,
    ) -> ApplicationResult<String> {
        let api = self.api.connect(config)?;

        let branches = api.branch_list(url)?;
        let branch = match branches.as_slice() {
            [] => return Err(ApplicationError::NoBranches(url.to_string())),
            [only] => only.clone(),
            _ => list_selection(self.selector.as_ref(), &branches, BRANCH_PROMPT)?,
        };
        debug!("deploying branch {branch}");

        let name = api.add_repository(url, &branch, &[])?;
        api.deploy(&DeployRequest {
            suffix: name.clone(),
            resource_type: ResourceType::Repository,
            plan: plan.clone(),
            env: options.env.clone(),
            release: release_tag(),
        })?;
        info!("repository {url} ({branch}) deployed as {name}");
        Ok(name)
    }

    /// Package `root`, upload it and deploy it. Returns the deployment name.
    #[instrument(skip(self, config, options))]
    pub fn deploy_package(
        &self,
        root: &Path,
        config: &Config,
        plan: &Plan,
        options: &DeployOptions,
    ) -> ApplicationResult<String> {
        let name = match &options.project_name {
            Some(name) => name.clone(),
            None => self.project_name(root)?,
        };
        let env = merge_env(self.dotenv(root)?, &options.env);

        let package = self.packages.generate(root)?;
        let archive = self.packages.archive(&package)?;

        let api = self.api.connect(config)?;
        api.upload_package(&PackageUpload {
            name: name.clone(),
            archive,
            jsons: package.descriptors.iter().map(|d| d.content.clone()).collect(),
            runners: package.runners.iter().cloned().collect(),
        })?;
        api.deploy(&DeployRequest {
            suffix: name.clone(),
            resource_type: ResourceType::Package,
            plan: plan.clone(),
            env,
            release: release_tag(),
        })?;
        info!("{} deployed as {name}", root.display());
        Ok(name)
    }

    /// Last component of the canonical path of `root`.
    fn project_name(&self, root: &Path) -> ApplicationResult<String> {
        let canonical = self
            .fs
            .canonicalize(root)
            .with_path_context("resolve work directory", root)?;
        canonical
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| DomainError::InvalidProjectName(root.display().to_string()).into())
    }

    fn dotenv(&self, root: &Path) -> ApplicationResult<Vec<EnvVar>> {
        let path = root.join(DOTENV_FILE);
        if !self.fs.exists(&path) {
            return Ok(Vec::new());
        }
        let content = self
            .fs
            .read_to_string(&path)
            .with_path_context("read env file", &path)?;
        Ok(parse_dotenv(&content)?)
    }
}

/// Hex millisecond timestamp distinguishing successive deploys.
fn release_tag() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("{millis:x}")
}
