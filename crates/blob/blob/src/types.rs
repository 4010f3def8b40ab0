use std::fmt;

use crate::stream::ByteStream;

/// A fully resolved blob: metadata plus a lazy stream over its bytes.
///
/// The stream is single-consumer and forward-only; ownership transfers to
/// the caller, who must drain or drop it to release the underlying source.
pub struct ResolvedBlob {
    /// Size in bytes, as recorded in the metadata row.
    pub size: u64,
    /// MIME content type, when one was recorded.
    pub mime_type: Option<String>,
    /// The blob's bytes.
    pub stream: ByteStream,
}

impl fmt::Debug for ResolvedBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedBlob")
            .field("size", &self.size)
            .field("mime_type", &self.mime_type)
            .finish_non_exhaustive()
    }
}
