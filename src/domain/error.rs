//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid values supplied by the user.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid environment variable '{0}', expected NAME=value")]
    InvalidEnvVar(String),

    #[error("plan name must not be empty")]
    EmptyPlan,

    #[error("cannot derive a project name from path: {0}")]
    InvalidProjectName(String),
}
