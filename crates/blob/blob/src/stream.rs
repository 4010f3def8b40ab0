use bytes::Bytes;
use futures::stream::BoxStream;

/// A lazy, single-consumer sequence of blob bytes.
///
/// Chunks arrive on demand; errors mid-stream belong to the underlying
/// source's contract. Dropping the stream releases the source's transport
/// (HTTP connection, store handle).
pub type ByteStream = BoxStream<'static, std::io::Result<Bytes>>;
