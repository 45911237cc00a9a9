//! Application-level errors (wraps domain and platform errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::ApiError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("No deployment found")]
    NoDeployments,

    #[error("No selection made")]
    SelectionCancelled,

    #[error("selection index {index} out of range for {len} items")]
    InvalidSelection { index: usize, len: usize },

    #[error("no branches found for repository: {0}")]
    NoBranches(String),

    #[error("account is disabled, contact the platform administrator")]
    AccountDisabled,

    #[error("Invalid root path, {} is empty.", .0.display())]
    EmptyRootPath(PathBuf),

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
