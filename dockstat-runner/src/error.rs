//! Runner Errors

use dockstat_core::{ConfigError, ConsistencyError, ExecutionError};
use dockstat_report::{FailureClass, TableError};
use thiserror::Error;

/// Any failure the runner can surface.
#[derive(Debug, Error)]
pub enum RunError {
    /// The run could not start.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A unit executor failed.
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// Units disagreed on measure names or series lengths.
    #[error(transparent)]
    Consistency(#[from] ConsistencyError),

    /// A result table could not be read or written.
    #[error(transparent)]
    Table(#[from] TableError),

    /// The worker pool could not be built.
    #[error("failed to build worker pool: {0}")]
    Pool(String),
}

impl RunError {
    /// The summary failure class this error belongs to.
    pub fn failure_class(&self) -> FailureClass {
        match self {
            RunError::Config(_) | RunError::Pool(_) => FailureClass::Config,
            RunError::Execution(_) => FailureClass::Execution,
            RunError::Consistency(_) => FailureClass::Consistency,
            RunError::Table(_) => FailureClass::Io,
        }
    }
}
