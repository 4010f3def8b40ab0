//! Read-access facade for content-addressed blobs attached to records in a
//! per-actor data store.
//!
//! [`BlobReader`] resolves a cid to metadata and a lazy byte stream, falling
//! back between an externally hosted URL and the local content store, and
//! exposes the enumeration queries used for synchronization and
//! garbage-collection reconciliation.

pub mod error;
pub mod fetch;
pub mod reader;

pub use error::ReaderError;
pub use fetch::{FetchError, HttpFetcher, RemoteFetcher};
pub use reader::{BlobReader, ListBlobsOpts};
