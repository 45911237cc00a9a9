//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{
    DeployService, DeploymentService, PackageService, StartupService,
};
use crate::config::{global_config_path, Settings};
use crate::infrastructure::traits::{
    ApiConnector, FileSystem, HttpConnector, Prompter, RealFileSystem, Selector, SkimSelector,
    TerminalPrompter,
};

/// Container holding the I/O boundaries; services are built on demand.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Interactive list selection
    pub selector: Arc<dyn Selector>,

    /// Free-text terminal input
    pub prompter: Arc<dyn Prompter>,

    /// Platform client factory
    pub api: Arc<dyn ApiConnector>,

    /// Where a freshly obtained token is persisted (None: not persisted)
    pub credentials_path: Option<PathBuf>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let timeout = Duration::from_secs(settings.timeout_secs);
        let mut container = Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(SkimSelector),
            Arc::new(TerminalPrompter),
            Arc::new(HttpConnector::new(timeout)),
        );
        container.credentials_path = global_config_path();
        container
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        selector: Arc<dyn Selector>,
        prompter: Arc<dyn Prompter>,
        api: Arc<dyn ApiConnector>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
            selector,
            prompter,
            api,
            credentials_path: None,
        }
    }

    pub fn startup_service(&self) -> StartupService {
        StartupService::new(
            self.settings.clone(),
            self.api.clone(),
            self.prompter.clone(),
            self.fs.clone(),
            self.credentials_path.clone(),
        )
    }

    pub fn deployment_service(&self) -> DeploymentService {
        DeploymentService::new(self.api.clone())
    }

    pub fn deploy_service(&self) -> DeployService {
        DeployService::new(
            self.api.clone(),
            self.selector.clone(),
            self.fs.clone(),
            PackageService::new(self.fs.clone()),
        )
    }
}
