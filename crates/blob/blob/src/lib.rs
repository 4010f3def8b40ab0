pub mod error;
pub mod store;
pub mod stream;
pub mod types;

pub use error::BlobError;
pub use store::BlobStore;
pub use stream::ByteStream;
pub use types::ResolvedBlob;
