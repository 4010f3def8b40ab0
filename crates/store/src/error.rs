use thiserror::Error;

/// Errors that can occur while opening a per-actor database.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database could not be opened or the pool could not be created.
    #[error("connection error: {0}")]
    Connection(String),

    /// A schema migration statement failed.
    #[error("migration error: {0}")]
    Migration(String),
}
