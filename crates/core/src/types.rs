use serde::{Deserialize, Serialize};

/// Metadata for a stored blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobMetadata {
    /// Size in bytes.
    pub size: u64,
    /// MIME content type (e.g. `"image/png"`), when one was recorded.
    pub mime_type: Option<String>,
}

/// Where a blob's bytes live.
///
/// Decided once, from the metadata row, before committing to a source;
/// callers dispatch on the variant instead of inspecting the row again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobLocation {
    /// Bytes are hosted at an external origin and fetched over HTTP.
    Remote(String),
    /// Bytes are held by the local content store under the blob's cid.
    Local,
}

/// Moderation takedown state for a blob whose metadata row exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TakedownStatus {
    /// Whether a takedown is currently applied.
    pub applied: bool,
    /// The opaque moderation reference, present when applied.
    pub takedown_ref: Option<String>,
}

impl TakedownStatus {
    /// Status for a blob withheld under the given moderation reference.
    pub fn applied(takedown_ref: impl Into<String>) -> Self {
        Self {
            applied: true,
            takedown_ref: Some(takedown_ref.into()),
        }
    }

    /// Status for a blob with no takedown in effect.
    pub fn not_applied() -> Self {
        Self {
            applied: false,
            takedown_ref: None,
        }
    }
}

/// A dangling association: a record references a cid that has no
/// corresponding row in the blob metadata table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingBlob {
    /// The referenced cid with no stored blob.
    pub cid: String,
    /// One of the records referencing it.
    pub record_uri: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takedown_status_constructors() {
        assert_eq!(
            TakedownStatus::applied("mod-1"),
            TakedownStatus {
                applied: true,
                takedown_ref: Some("mod-1".to_owned()),
            }
        );
        assert_eq!(
            TakedownStatus::not_applied(),
            TakedownStatus {
                applied: false,
                takedown_ref: None,
            }
        );
    }

    #[test]
    fn wire_shapes_are_camel_case() {
        let status = serde_json::to_value(TakedownStatus::applied("mod-1")).unwrap();
        assert_eq!(
            status,
            serde_json::json!({"applied": true, "takedownRef": "mod-1"})
        );

        let missing = serde_json::to_value(MissingBlob {
            cid: "bafkreiexample".to_owned(),
            record_uri: "repo/alice/posts/1".to_owned(),
        })
        .unwrap();
        assert_eq!(
            missing,
            serde_json::json!({"cid": "bafkreiexample", "recordUri": "repo/alice/posts/1"})
        );

        let metadata = serde_json::to_value(BlobMetadata {
            size: 12,
            mime_type: Some("image/png".to_owned()),
        })
        .unwrap();
        assert_eq!(
            metadata,
            serde_json::json!({"size": 12, "mimeType": "image/png"})
        );
    }
}
