//! Existing deployments: listing and deletion

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::ApplicationResult;
use crate::domain::{Config, Deployment};
use crate::infrastructure::traits::ApiConnector;

/// Queries and removes deployments of the account.
pub struct DeploymentService {
    api: Arc<dyn ApiConnector>,
}

impl DeploymentService {
    pub fn new(api: Arc<dyn ApiConnector>) -> Self {
        Self { api }
    }

    /// All deployments, as reported by the platform.
    pub fn list(&self, config: &Config) -> ApplicationResult<Vec<Deployment>> {
        let deployments = self.api.connect(config)?.inspect()?;
        debug!("list: {} deployments", deployments.len());
        Ok(deployments)
    }

    /// Deployments with status `ready`, the only ones that can be deleted.
    pub fn list_ready(&self, config: &Config) -> ApplicationResult<Vec<Deployment>> {
        Ok(self
            .list(config)?
            .into_iter()
            .filter(Deployment::is_ready)
            .collect())
    }

    pub fn delete(&self, config: &Config, deployment: &Deployment) -> ApplicationResult<()> {
        info!(
            "deleting {}/{} version {}",
            deployment.prefix, deployment.suffix, deployment.version
        );
        self.api.connect(config)?.delete(
            &deployment.prefix,
            &deployment.suffix,
            &deployment.version,
        )?;
        Ok(())
    }
}
