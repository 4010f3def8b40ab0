use sqlx::SqlitePool;

/// Run database migrations, creating required tables if they do not exist.
///
/// This creates the `blob` metadata table, the `record` table, and the
/// `record_blob` association table.
///
/// # Errors
///
/// Returns a [`sqlx::Error`] if any DDL statement fails.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    const CREATE_BLOB: &str = "CREATE TABLE IF NOT EXISTS blob (
            cid TEXT PRIMARY KEY,
            mime_type TEXT,
            size INTEGER NOT NULL,
            blob_url TEXT,
            takedown_ref TEXT,
            created_at TEXT NOT NULL
        )";

    const CREATE_RECORD: &str = "CREATE TABLE IF NOT EXISTS record (
            uri TEXT PRIMARY KEY,
            cid TEXT NOT NULL,
            repo_rev TEXT,
            indexed_at TEXT NOT NULL
        )";

    const CREATE_RECORD_BLOB: &str = "CREATE TABLE IF NOT EXISTS record_blob (
            record_uri TEXT NOT NULL,
            blob_cid TEXT NOT NULL,
            PRIMARY KEY (record_uri, blob_cid)
        )";

    // Index on blob_cid backs the keyset-paginated enumerations and the
    // reverse association traversal.
    const CREATE_RECORD_BLOB_CID_IDX: &str =
        "CREATE INDEX IF NOT EXISTS record_blob_cid_idx ON record_blob (blob_cid)";

    sqlx::query(CREATE_BLOB).execute(pool).await?;
    sqlx::query(CREATE_RECORD).execute(pool).await?;
    sqlx::query(CREATE_RECORD_BLOB).execute(pool).await?;
    sqlx::query(CREATE_RECORD_BLOB_CID_IDX).execute(pool).await?;

    Ok(())
}
