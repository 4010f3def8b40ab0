pub mod cid;
pub mod types;

pub use cid::{Cid, CidError};
pub use types::{BlobLocation, BlobMetadata, MissingBlob, TakedownStatus};
