//! Error types for the resource pool

use std::time::Duration;

use thiserror::Error;

/// Boxed error used at the seams the pool does not control: resource
/// creation, borrow checks, and resource close.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("get on closed pool")]
    Closed,

    #[error("resource creation failed")]
    Create(#[source] BoxError),

    #[error("timed out after {0:?} waiting for a pooled resource")]
    Timeout(Duration),

    #[error("{failed} resource(s) failed to close during pool shutdown")]
    Shutdown { failed: usize },
}

pub type PoolResult<T> = Result<T, PoolError>;
