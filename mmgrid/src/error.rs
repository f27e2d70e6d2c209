//! Error types for grid storage, views and locking

use mmgrid_core::GridError;
use thiserror::Error;

/// Errors raised by grid operations
///
/// Owner death of the embedded mutex is not an error: it is reported as
/// [`LockStatus::OwnerDied`](crate::sync::LockStatus::OwnerDied).
#[derive(Error, Debug)]
pub enum Error {
    /// File creation, sizing or mapping failed
    #[error("{context}: {source}")]
    Io {
        /// Which step failed
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// A file failed format validation or a shape was inconsistent
    #[error("invalid grid: {0}")]
    Format(GridError),

    /// The operation is not available for this grid
    #[error("operation not supported: {0}")]
    NotSupported(&'static str),

    /// The persistent grid has no backing mapping
    #[error("grid is not mapped")]
    Unmapped,

    /// The embedded mutex reported an error code
    #[error("mutex operation failed with code {0}")]
    Lock(i32),

    /// A previous owner died and the mutex was released without being
    /// marked consistent
    #[error("mutex is not recoverable")]
    NotRecoverable,
}

impl Error {
    pub(crate) fn io(context: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |source| Error::Io { context, source }
    }
}

// GridError is no_std and has no std::error::Error impl
impl From<GridError> for Error {
    fn from(error: GridError) -> Self {
        Error::Format(error)
    }
}

/// Result type for grid operations
pub type Result<T> = std::result::Result<T, Error>;
