//! CLI-level errors (wraps application errors)

use std::path::PathBuf;

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::exitcode::{ErrorCode, FAILURE};

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{0}")]
    Usage(String),

    #[error("Invalid root path, {} not found.", .0.display())]
    RootPathNotFound(PathBuf),

    #[error("Invalid root path, {} is not a directory.", .0.display())]
    RootPathNotDirectory(PathBuf),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        CliError::Application(e.into())
    }
}

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::RootPathNotFound(_) => ErrorCode::NotFoundRootPath.code(),
            CliError::RootPathNotDirectory(_) => ErrorCode::NotDirectoryRootPath.code(),
            CliError::Application(ApplicationError::EmptyRootPath(_)) => {
                ErrorCode::EmptyRootPath.code()
            }
            CliError::Application(ApplicationError::AccountDisabled) => {
                ErrorCode::AccountDisabled.code()
            }
            CliError::Application(_) | CliError::Usage(_) => FAILURE,
        }
    }
}
