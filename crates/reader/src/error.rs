use thiserror::Error;

use holdfast_blob::BlobError;
use holdfast_core::CidError;

/// Errors surfaced by the blob read facade.
///
/// [`BlobNotFound`](ReaderError::BlobNotFound) collapses every cause of
/// unreachable bytes (no metadata row, withheld row, failed fetch of an
/// externally hosted blob, content-store miss) so callers cannot tell the
/// backing source apart from the error alone. Everything else propagates
/// untranslated.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// No usable metadata row for the cid, or its backing bytes are
    /// unreachable.
    #[error("blob not found")]
    BlobNotFound,

    /// A record store query failed.
    #[error(transparent)]
    Db(#[from] sqlx::Error),

    /// The content store failed with something other than a miss.
    #[error(transparent)]
    Store(BlobError),

    /// A stored identifier failed to parse.
    #[error(transparent)]
    Cid(#[from] CidError),
}
