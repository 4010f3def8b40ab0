use std::sync::Arc;

use tracing::{debug, instrument, warn};

use holdfast_blob::{BlobError, BlobStore, ResolvedBlob};
use holdfast_core::{BlobLocation, BlobMetadata, Cid, MissingBlob, TakedownStatus};
use holdfast_store::ActorDb;

use crate::error::ReaderError;
use crate::fetch::{HttpFetcher, RemoteFetcher};

/// Page size applied when the caller does not name one.
const DEFAULT_LIST_LIMIT: u32 = 500;

/// Options for the incremental blob enumeration.
#[derive(Debug, Clone, Default)]
pub struct ListBlobsOpts {
    /// Exclusive revision watermark: only blobs referenced by a record whose
    /// revision is strictly greater are returned.
    pub since: Option<String>,
    /// Exclusive keyset cursor: only cids strictly greater are returned.
    pub cursor: Option<String>,
    /// Page size cap.
    pub limit: Option<u32>,
}

impl ListBlobsOpts {
    /// The page size to apply, falling back to the default.
    pub fn effective_limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIST_LIMIT)
    }
}

/// Read facade over the record store and the content store.
///
/// Every operation is a point-in-time read; no locking is performed and
/// concurrent calls are independent. Byte streams returned from
/// [`get_blob`](Self::get_blob) are owned by the caller.
pub struct BlobReader {
    db: ActorDb,
    store: Arc<dyn BlobStore>,
    fetcher: Arc<dyn RemoteFetcher>,
}

impl BlobReader {
    /// Create a reader over `db` and `store`, fetching externally hosted
    /// blobs with a default [`HttpFetcher`].
    pub fn new(db: ActorDb, store: Arc<dyn BlobStore>) -> Self {
        Self::with_fetcher(db, store, Arc::new(HttpFetcher::new()))
    }

    /// Create a reader with a custom remote fetcher.
    pub fn with_fetcher(
        db: ActorDb,
        store: Arc<dyn BlobStore>,
        fetcher: Arc<dyn RemoteFetcher>,
    ) -> Self {
        Self { db, store, fetcher }
    }

    /// Look up the metadata row for `cid`.
    ///
    /// Fails with [`ReaderError::BlobNotFound`] when no row exists or the
    /// row is withheld by moderation.
    pub async fn get_blob_metadata(&self, cid: &Cid) -> Result<BlobMetadata, ReaderError> {
        let row = sqlx::query_as::<_, BlobMetaRow>(
            "SELECT size, mime_type FROM blob WHERE cid = ? AND takedown_ref IS NULL",
        )
        .bind(cid.as_str())
        .fetch_optional(self.db.pool())
        .await?;

        row.map(Into::into).ok_or(ReaderError::BlobNotFound)
    }

    /// Metadata plus the blob's location, decided before committing to a
    /// source. The location never leaves this crate's public surface.
    async fn located_metadata(
        &self,
        cid: &Cid,
    ) -> Result<(BlobMetadata, BlobLocation), ReaderError> {
        let row = sqlx::query_as::<_, LocatedBlobRow>(
            "SELECT size, mime_type, blob_url FROM blob WHERE cid = ? AND takedown_ref IS NULL",
        )
        .bind(cid.as_str())
        .fetch_optional(self.db.pool())
        .await?
        .ok_or(ReaderError::BlobNotFound)?;

        let location = match row.blob_url {
            Some(url) => BlobLocation::Remote(url),
            None => BlobLocation::Local,
        };
        #[allow(clippy::cast_sign_loss)]
        let size = row.size as u64;
        let metadata = BlobMetadata {
            size,
            mime_type: row.mime_type,
        };
        Ok((metadata, location))
    }

    /// Resolve `cid` to metadata and a lazy stream over its bytes.
    ///
    /// Bytes come from the origin named in the metadata row when one is
    /// present, otherwise from the local content store. A failed remote
    /// fetch or a content-store miss surfaces as the same
    /// [`ReaderError::BlobNotFound`] as a missing row; any other
    /// content-store failure propagates unchanged.
    #[instrument(skip(self, cid), fields(cid = %cid))]
    pub async fn get_blob(&self, cid: &Cid) -> Result<ResolvedBlob, ReaderError> {
        let (metadata, location) = self.located_metadata(cid).await?;

        match location {
            BlobLocation::Remote(url) => {
                debug!("streaming externally hosted blob");
                match self.fetcher.fetch(&url).await {
                    Ok(stream) => Ok(ResolvedBlob {
                        size: metadata.size,
                        mime_type: metadata.mime_type,
                        stream,
                    }),
                    Err(err) => {
                        // The external origin is presumed gone; collapses to
                        // the same error as a local miss.
                        warn!(%err, "remote blob fetch failed");
                        Err(ReaderError::BlobNotFound)
                    }
                }
            }
            BlobLocation::Local => {
                let metadata = self.get_blob_metadata(cid).await?;
                debug!("streaming blob from content store");
                match self.store.get_stream(cid).await {
                    Ok(stream) => Ok(ResolvedBlob {
                        size: metadata.size,
                        mime_type: metadata.mime_type,
                        stream,
                    }),
                    Err(BlobError::NotFound(_)) => Err(ReaderError::BlobNotFound),
                    Err(other) => Err(ReaderError::Store(other)),
                }
            }
        }
    }

    /// Moderation takedown state for `cid`.
    ///
    /// `None` means no metadata row exists at all, distinct from a row with
    /// no takedown in effect. The withheld predicate is not composed here:
    /// moderation state stays queryable for withheld blobs.
    pub async fn takedown_status(&self, cid: &Cid) -> Result<Option<TakedownStatus>, ReaderError> {
        let row = sqlx::query_as::<_, TakedownRow>("SELECT takedown_ref FROM blob WHERE cid = ?")
            .bind(cid.as_str())
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(|r| match r.takedown_ref {
            Some(reference) => TakedownStatus::applied(reference),
            None => TakedownStatus::not_applied(),
        }))
    }

    /// Cids referenced by the given record.
    pub async fn blobs_for_record(&self, record_uri: &str) -> Result<Vec<String>, ReaderError> {
        let cids = sqlx::query_scalar(
            "SELECT blob_cid FROM record_blob WHERE record_uri = ? ORDER BY blob_cid ASC",
        )
        .bind(record_uri)
        .fetch_all(self.db.pool())
        .await?;
        Ok(cids)
    }

    /// Records referencing the given cid.
    pub async fn records_for_blob(&self, cid: &Cid) -> Result<Vec<String>, ReaderError> {
        let uris = sqlx::query_scalar(
            "SELECT record_uri FROM record_blob WHERE blob_cid = ? ORDER BY record_uri ASC",
        )
        .bind(cid.as_str())
        .fetch_all(self.db.pool())
        .await?;
        Ok(uris)
    }

    /// Total row count in the blob metadata table.
    pub async fn blob_count(&self) -> Result<u64, ReaderError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blob")
            .fetch_one(self.db.pool())
            .await?;

        #[allow(clippy::cast_sign_loss)]
        let count = count as u64;
        Ok(count)
    }

    /// Count of distinct cids referenced by at least one association row.
    ///
    /// Can diverge from [`blob_count`](Self::blob_count) in both directions;
    /// the divergence is what
    /// [`list_missing_blobs`](Self::list_missing_blobs) reconciles.
    pub async fn record_blob_count(&self) -> Result<u64, ReaderError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT blob_cid) FROM record_blob")
            .fetch_one(self.db.pool())
            .await?;

        #[allow(clippy::cast_sign_loss)]
        let count = count as u64;
        Ok(count)
    }

    /// Enumerate distinct referenced cids, ascending, keyset-paginated.
    ///
    /// A full page means the caller should re-query with the last returned
    /// cid as the new cursor.
    pub async fn list_blobs(&self, opts: &ListBlobsOpts) -> Result<Vec<String>, ReaderError> {
        let mut sql = String::from("SELECT DISTINCT record_blob.blob_cid FROM record_blob");
        if opts.since.is_some() {
            sql.push_str(" JOIN record ON record.uri = record_blob.record_uri");
        }

        let mut conditions: Vec<&str> = Vec::new();
        if opts.since.is_some() {
            conditions.push("record.repo_rev > ?");
        }
        if opts.cursor.is_some() {
            conditions.push("record_blob.blob_cid > ?");
        }
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY record_blob.blob_cid ASC LIMIT ?");

        let mut query = sqlx::query_scalar::<_, String>(&sql);
        if let Some(ref since) = opts.since {
            query = query.bind(since.as_str());
        }
        if let Some(ref cursor) = opts.cursor {
            query = query.bind(cursor.as_str());
        }
        query = query.bind(i64::from(opts.effective_limit()));

        Ok(query.fetch_all(self.db.pool()).await?)
    }

    /// Enumerate association rows whose cid has no metadata row, ascending,
    /// keyset-paginated. One row per distinct missing cid; which referencing
    /// record represents the group is the store's pick.
    pub async fn list_missing_blobs(
        &self,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<Vec<MissingBlob>, ReaderError> {
        let mut sql = String::from(
            "SELECT record_blob.blob_cid, record_blob.record_uri FROM record_blob \
             WHERE NOT EXISTS (SELECT 1 FROM blob WHERE blob.cid = record_blob.blob_cid)",
        );
        if cursor.is_some() {
            sql.push_str(" AND record_blob.blob_cid > ?");
        }
        sql.push_str(" GROUP BY record_blob.blob_cid ORDER BY record_blob.blob_cid ASC LIMIT ?");

        let mut query = sqlx::query_as::<_, MissingBlobRow>(&sql);
        if let Some(cursor) = cursor {
            query = query.bind(cursor);
        }
        query = query.bind(i64::from(limit));

        let rows = query.fetch_all(self.db.pool()).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Every identifier in the metadata table, parsed.
    ///
    /// Unbounded: callers working against stores that cap result sizes must
    /// bound the enumeration themselves.
    pub async fn blob_cids(&self) -> Result<Vec<Cid>, ReaderError> {
        let rows: Vec<String> = sqlx::query_scalar("SELECT cid FROM blob ORDER BY cid ASC")
            .fetch_all(self.db.pool())
            .await?;

        let cids = rows
            .iter()
            .map(|text| Cid::parse(text))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(cids)
    }
}

/// Internal row type for plain metadata lookups.
#[derive(sqlx::FromRow)]
struct BlobMetaRow {
    size: i64,
    mime_type: Option<String>,
}

impl From<BlobMetaRow> for BlobMetadata {
    fn from(row: BlobMetaRow) -> Self {
        #[allow(clippy::cast_sign_loss)]
        let size = row.size as u64;
        Self {
            size,
            mime_type: row.mime_type,
        }
    }
}

/// Internal row type carrying the external location.
#[derive(sqlx::FromRow)]
struct LocatedBlobRow {
    size: i64,
    mime_type: Option<String>,
    blob_url: Option<String>,
}

/// Internal row type for the takedown-status lookup.
#[derive(sqlx::FromRow)]
struct TakedownRow {
    takedown_ref: Option<String>,
}

/// Internal row type for the missing-blob reconciliation query.
#[derive(sqlx::FromRow)]
struct MissingBlobRow {
    blob_cid: String,
    record_uri: String,
}

impl From<MissingBlobRow> for MissingBlob {
    fn from(row: MissingBlobRow) -> Self {
        Self {
            cid: row.blob_cid,
            record_uri: row.record_uri,
        }
    }
}
