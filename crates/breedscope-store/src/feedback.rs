//! DuckDB feedback table: one row per user-corrected breed label.

use std::path::Path;
use std::sync::Mutex;

use arrow::record_batch::RecordBatch;
use duckdb::{Connection, params};
use tracing::{debug, info};

use crate::{FeedbackSummary, NewFeedback, StoreError};

const CREATE_TABLE: &str = r#"
CREATE SEQUENCE IF NOT EXISTS feedback_id_seq START 1;
CREATE TABLE IF NOT EXISTS feedback (
    id BIGINT NOT NULL DEFAULT nextval('feedback_id_seq'),
    image BLOB,
    correct_breed VARCHAR,
    "timestamp" VARCHAR
);
"#;

// No index on `id`: DuckDB cannot ALTER indexed tables. The sequence keeps ids unique.

/// Columns added after the first release, appended when missing.
const ADDED_COLUMNS: &[(&str, &str)] = &[("original_top_breed", "VARCHAR")];

/// Append-only store of breed corrections.
///
/// Holds one database handle; every operation works on its own connection
/// cloned from it, which is closed when the operation returns.
///
/// Use [`open`](Self::open) for an ephemeral in-memory database and
/// [`open_persistent`](Self::open_persistent) for a file that survives restarts.
pub struct FeedbackStore {
    db: Mutex<Connection>,
}

impl FeedbackStore {
    /// Open an in-memory DuckDB database.
    pub fn open() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    /// Open or create a persistent DuckDB database at the given path.
    pub fn open_persistent(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "opened feedback database");
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let db = self.db.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(db.try_clone()?)
    }

    /// Create the feedback table if absent and add any missing columns.
    ///
    /// Never drops or renames anything, so it is safe on every start.
    pub fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.connect()?;
        conn.execute_batch(CREATE_TABLE)?;

        let existing = table_columns(&conn)?;
        for &(name, sql_type) in ADDED_COLUMNS {
            if !existing.iter().any(|c| c == name) {
                conn.execute_batch(&format!("ALTER TABLE feedback ADD COLUMN {name} {sql_type}"))?;
                info!(column = name, "migrated feedback table");
            }
        }
        Ok(())
    }

    /// Persist one correction, stamping it with the current local time.
    ///
    /// Returns the assigned id. Breed names are stored as given.
    pub fn insert(&self, feedback: &NewFeedback<'_>) -> Result<i64, StoreError> {
        let conn = self.connect()?;
        let timestamp = chrono::Local::now()
            .format("%Y-%m-%dT%H:%M:%S%.6f")
            .to_string();

        let id: i64 = conn.query_row(
            r#"INSERT INTO feedback (image, correct_breed, original_top_breed, "timestamp")
               VALUES (?, ?, ?, ?)
               RETURNING id"#,
            params![
                feedback.image,
                feedback.correct_breed,
                feedback.original_top_breed,
                timestamp
            ],
            |row| row.get(0),
        )?;

        debug!(id, breed = feedback.correct_breed, bytes = feedback.image.len(), "stored feedback");
        Ok(id)
    }

    // ── Offline analysis ──

    /// Number of stored corrections.
    pub fn count(&self) -> Result<usize, StoreError> {
        let conn = self.connect()?;
        let n: i64 = conn.query_row("SELECT count(*)::BIGINT FROM feedback", [], |row| {
            row.get(0)
        })?;
        Ok(n as usize)
    }

    /// The most recent corrections, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<FeedbackSummary>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            r#"SELECT id, correct_breed, original_top_breed, "timestamp",
                      octet_length(image)::BIGINT
               FROM feedback
               ORDER BY id DESC
               LIMIT ?"#,
        )?;
        let rows = stmt.query_map([limit as i64], |row| {
            Ok(FeedbackSummary {
                id: row.get(0)?,
                correct_breed: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                original_top_breed: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                timestamp: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                image_bytes: row.get::<_, Option<i64>>(4)?.unwrap_or(0) as u64,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Submissions per corrected breed as `(correct_breed, submissions)`,
    /// most corrected first.
    pub fn breed_counts(&self) -> Result<Vec<RecordBatch>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT correct_breed, count(*)::BIGINT AS submissions
             FROM feedback
             GROUP BY correct_breed
             ORDER BY submissions DESC, correct_breed",
        )?;
        let batches: Vec<RecordBatch> = stmt.query_arrow([])?.collect();
        Ok(batches)
    }

    /// Write every correction, image bytes included, to a Parquet file.
    ///
    /// Returns the number of rows written.
    pub fn export_parquet(&self, path: &Path) -> Result<usize, StoreError> {
        let conn = self.connect()?;
        let target = path.display().to_string().replace('\'', "''");
        let sql = format!(
            r#"COPY (
                SELECT id, image, correct_breed, original_top_breed, "timestamp"
                FROM feedback
                ORDER BY id
            ) TO '{target}' (FORMAT PARQUET)"#
        );
        conn.execute_batch(&sql)?;
        let count = self.count()?;
        info!(count, path = %path.display(), "exported feedback to parquet");
        Ok(count)
    }
}

fn table_columns(conn: &Connection) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT column_name FROM information_schema.columns
         WHERE table_name = 'feedback'
         ORDER BY ordinal_position",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
