//! Error types for the resource pool

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("Pool is empty - no resources available")]
    PoolEmpty,

    #[error("Timed out after {0:?} waiting for a resource")]
    Timeout(Duration),
}

pub type PoolResult<T> = Result<T, PoolError>;
