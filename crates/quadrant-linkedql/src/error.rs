//! Query errors.

use quadrant_store::{NodeId, StoreError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    /// A step is malformed. Raised at compile time; never worth retrying.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Opaque failure from the store, passed through unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A node id the store could not turn back into a value.
    #[error("cannot resolve node {0} to a value")]
    Resolution(NodeId),

    #[error("query canceled")]
    Canceled,
}

impl QueryError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        QueryError::Configuration(msg.into())
    }

    /// Cancellation ends a query without making it a failure.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, QueryError::Canceled)
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;
