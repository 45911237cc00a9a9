//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, ApiConnector, Selector, ...)
//! but are themselves concrete structs, not traits.

mod deploy;
mod deployment;
mod package;
mod startup;

pub use deploy::{DeployOptions, DeployService};
pub use deployment::DeploymentService;
pub use package::{PackageService, SKIPPED_DIRS, SKIPPED_FILES};
pub use startup::{LoginArgs, StartupService, DEV_BASE_URL};
