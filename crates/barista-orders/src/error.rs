//! Error types for the order store.

use std::path::PathBuf;

/// Errors that can occur while saving or loading orders.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    /// A filesystem operation failed.
    #[error("order store I/O error at {}: {source}", path.display())]
    Io {
        /// The file or directory being accessed.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An order could not be encoded to, or decoded from, JSON.
    #[error("order serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Every sequence suffix for the given second is already taken.
    #[error("no free order identifier left for second {0}")]
    IdExhausted(u64),
}

impl OrderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
