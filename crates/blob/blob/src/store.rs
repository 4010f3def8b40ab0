use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::TryStreamExt;

use holdfast_core::Cid;

use crate::error::BlobError;
use crate::stream::ByteStream;

/// Pluggable content store holding blob bytes keyed by cid.
///
/// Implementors provide the actual storage mechanism (e.g. disk, S3,
/// memory). This crate does not ship a production implementation; deployments
/// bring their own. Only the read side is expressed here; ingestion and
/// deletion belong to the write path.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Open a stream over the bytes stored under `cid`.
    ///
    /// Fails with [`BlobError::NotFound`] when nothing is stored under the
    /// cid; any other failure is a backend error.
    async fn get_stream(&self, cid: &Cid) -> Result<ByteStream, BlobError>;

    /// Whether bytes are stored under `cid`.
    async fn has_stored(&self, cid: &Cid) -> Result<bool, BlobError>;

    /// Buffer the blob fully into memory.
    ///
    /// The default drains [`get_stream`](Self::get_stream); backends with a
    /// cheaper direct read can override it.
    async fn get_bytes(&self, cid: &Cid) -> Result<Bytes, BlobError> {
        let mut stream = self.get_stream(cid).await?;
        let mut buf = BytesMut::new();
        while let Some(chunk) = stream
            .try_next()
            .await
            .map_err(|e| BlobError::Storage(e.to_string()))?
        {
            buf.extend_from_slice(&chunk);
        }
        Ok(buf.freeze())
    }
}
