use thiserror::Error;

/// Errors that can occur during content store operations.
#[derive(Debug, Error)]
pub enum BlobError {
    /// No bytes are stored under the requested cid.
    #[error("blob not found: {0}")]
    NotFound(String),

    /// A storage backend error occurred.
    #[error("blob storage error: {0}")]
    Storage(String),
}
