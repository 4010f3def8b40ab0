use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use futures::StreamExt;
use futures::stream;

use holdfast_blob::{BlobError, BlobStore, ByteStream};
use holdfast_core::Cid;

const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

/// In-memory [`BlobStore`] backed by a concurrent map.
///
/// Streams are produced in fixed-size chunks so consumers exercise the same
/// multi-chunk path they would against a real backend.
pub struct MemoryBlobStore {
    blobs: DashMap<String, Bytes>,
    chunk_size: usize,
}

impl MemoryBlobStore {
    /// Create an empty store with the default chunk size.
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Create an empty store that streams in chunks of `chunk_size` bytes.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk size must be positive");
        Self {
            blobs: DashMap::new(),
            chunk_size,
        }
    }

    /// Store bytes under `cid`, replacing any previous value.
    pub fn put(&self, cid: &Cid, data: Bytes) {
        self.blobs.insert(cid.as_str().to_owned(), data);
    }

    /// Remove the bytes stored under `cid`. Returns `true` if present.
    pub fn remove(&self, cid: &Cid) -> bool {
        self.blobs.remove(cid.as_str()).is_some()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Whether the store holds no blobs.
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get_stream(&self, cid: &Cid) -> Result<ByteStream, BlobError> {
        let data = self
            .blobs
            .get(cid.as_str())
            .map(|entry| entry.value().clone())
            .ok_or_else(|| BlobError::NotFound(cid.to_string()))?;

        let chunk_size = self.chunk_size;
        let chunks: Vec<std::io::Result<Bytes>> = (0..data.len())
            .step_by(chunk_size)
            .map(|start| {
                let end = usize::min(start + chunk_size, data.len());
                Ok(data.slice(start..end))
            })
            .collect();

        Ok(stream::iter(chunks).boxed())
    }

    async fn has_stored(&self, cid: &Cid) -> Result<bool, BlobError> {
        Ok(self.blobs.contains_key(cid.as_str()))
    }

    async fn get_bytes(&self, cid: &Cid) -> Result<Bytes, BlobError> {
        self.blobs
            .get(cid.as_str())
            .map(|entry| entry.value().clone())
            .ok_or_else(|| BlobError::NotFound(cid.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use futures::TryStreamExt;

    use super::*;

    fn cid(text: &str) -> Cid {
        text.parse().unwrap()
    }

    #[tokio::test]
    async fn stream_roundtrip_in_chunks() {
        let store = MemoryBlobStore::with_chunk_size(4);
        let id = cid("bafkreionerecordblobaaaaaaaaaaaaaaaaaaaa");
        store.put(&id, Bytes::from_static(b"0123456789"));

        let stream = store.get_stream(&id).await.unwrap();
        let chunks: Vec<Bytes> = stream.try_collect().await.unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks.concat(), b"0123456789");
    }

    #[tokio::test]
    async fn missing_cid_is_not_found() {
        let store = MemoryBlobStore::new();
        let id = cid("bafkreimissingblobaaaaaaaaaaaaaaaaaaaaaa");

        let err = match store.get_stream(&id).await {
            Ok(_) => panic!("expected get_stream to fail for a missing cid"),
            Err(e) => e,
        };
        assert!(matches!(err, BlobError::NotFound(_)));
        assert!(!store.has_stored(&id).await.unwrap());
    }

    #[tokio::test]
    async fn get_bytes_matches_put() {
        let store = MemoryBlobStore::new();
        let id = cid("bafkreibytesroundtripaaaaaaaaaaaaaaaaaaa");
        store.put(&id, Bytes::from_static(b"payload"));

        let bytes = store.get_bytes(&id).await.unwrap();
        assert_eq!(&bytes[..], b"payload");
        assert!(store.has_stored(&id).await.unwrap());
    }

    #[tokio::test]
    async fn empty_blob_streams_no_chunks() {
        let store = MemoryBlobStore::new();
        let id = cid("bafkreiemptyblobaaaaaaaaaaaaaaaaaaaaaaaa");
        store.put(&id, Bytes::new());

        let stream = store.get_stream(&id).await.unwrap();
        let chunks: Vec<Bytes> = stream.try_collect().await.unwrap();
        assert!(chunks.is_empty());
    }
}
