//! Document Store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the bulk document snapshot read by the batch runs.
//! - Apply hold-flag and retention-field writes issued by the services.
//!
//! # Invariants
//! - `update_document_hold` never accepts more than `HOLD_BATCH_LIMIT` ids.
//! - Each write is atomic per statement; no write spans a multi-row
//!   transaction across calls.

use super::{
    bool_to_int, ensure_connection_ready, int_to_bool, RepoError, RepoResult, HOLD_BATCH_LIMIT,
};
use crate::model::document::{Document, RetentionTarget};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const DOCUMENT_SELECT_SQL: &str = "SELECT
    d_id,
    e_id,
    e_lhold,
    d_date,
    d_r_trigger,
    d_r_rule,
    d_r_month,
    d_r_deletion,
    d_r_status
FROM documents";

/// Document Store operations used by the batch services.
pub trait DocumentStore {
    fn list_documents(&self) -> RepoResult<Vec<Document>>;

    /// Sets `e_lhold` for every listed document in one call.
    ///
    /// Returns the number of rows the store reports as changed.
    fn update_document_hold(&self, ids: &[String], e_lhold: bool) -> RepoResult<usize>;

    /// Persists the resolver output for one document.
    fn update_document_retention(&self, d_id: &str, target: &RetentionTarget) -> RepoResult<()>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for &T {
    fn list_documents(&self) -> RepoResult<Vec<Document>> {
        (**self).list_documents()
    }

    fn update_document_hold(&self, ids: &[String], e_lhold: bool) -> RepoResult<usize> {
        (**self).update_document_hold(ids, e_lhold)
    }

    fn update_document_retention(&self, d_id: &str, target: &RetentionTarget) -> RepoResult<()> {
        (**self).update_document_retention(d_id, target)
    }
}

/// SQLite-backed document store.
pub struct SqliteDocumentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDocumentRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Inserts one document as produced by the ingestion flow.
    pub fn create_document(&self, document: &Document) -> RepoResult<()> {
        document.validate()?;

        self.conn.execute(
            "INSERT INTO documents (
                d_id,
                e_id,
                e_lhold,
                d_date,
                d_r_trigger,
                d_r_rule,
                d_r_month,
                d_r_deletion,
                d_r_status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                document.d_id.as_str(),
                document.e_id.as_deref(),
                bool_to_int(document.e_lhold),
                document.d_date.as_deref(),
                document.d_r_trigger.as_deref(),
                document.d_r_rule.as_deref(),
                document.d_r_month,
                document.d_r_deletion.as_deref(),
                document.d_r_status.as_str(),
            ],
        )?;

        Ok(())
    }

    pub fn get_document(&self, d_id: &str) -> RepoResult<Option<Document>> {
        let row = self
            .conn
            .query_row(
                &format!("{DOCUMENT_SELECT_SQL} WHERE d_id = ?1;"),
                [d_id],
                read_raw_document,
            )
            .optional()?;

        row.map(RawDocument::into_document).transpose()
    }
}

impl DocumentStore for SqliteDocumentRepository<'_> {
    fn list_documents(&self) -> RepoResult<Vec<Document>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DOCUMENT_SELECT_SQL} ORDER BY d_id ASC;"))?;
        let raw_rows = stmt
            .query_map([], read_raw_document)?
            .collect::<Result<Vec<_>, _>>()?;

        raw_rows
            .into_iter()
            .map(RawDocument::into_document)
            .collect()
    }

    fn update_document_hold(&self, ids: &[String], e_lhold: bool) -> RepoResult<usize> {
        if ids.len() > HOLD_BATCH_LIMIT {
            return Err(RepoError::BatchTooLarge {
                size: ids.len(),
                limit: HOLD_BATCH_LIMIT,
            });
        }
        if ids.is_empty() {
            return Ok(0);
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("UPDATE documents SET e_lhold = ? WHERE d_id IN ({placeholders});");

        let mut bind_values: Vec<Value> = Vec::with_capacity(ids.len() + 1);
        bind_values.push(Value::Integer(bool_to_int(e_lhold)));
        bind_values.extend(ids.iter().map(|id| Value::Text(id.clone())));

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        Ok(changed)
    }

    fn update_document_retention(&self, d_id: &str, target: &RetentionTarget) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE documents
             SET
                d_r_status = ?1,
                d_r_deletion = ?2
             WHERE d_id = ?3;",
            params![target.status.as_str(), target.deletion_text(), d_id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(d_id.to_string()));
        }

        Ok(())
    }
}

struct RawDocument {
    d_id: String,
    e_id: Option<String>,
    e_lhold: i64,
    d_date: Option<String>,
    d_r_trigger: Option<String>,
    d_r_rule: Option<String>,
    d_r_month: Value,
    d_r_deletion: Option<String>,
    d_r_status: String,
}

impl RawDocument {
    fn into_document(self) -> RepoResult<Document> {
        Ok(Document {
            e_lhold: int_to_bool(self.e_lhold, "documents.e_lhold")?,
            d_id: self.d_id,
            e_id: self.e_id,
            d_date: self.d_date,
            d_r_trigger: self.d_r_trigger,
            d_r_rule: self.d_r_rule,
            d_r_month: month_from_value(self.d_r_month),
            d_r_deletion: self.d_r_deletion,
            d_r_status: self.d_r_status,
        })
    }
}

fn read_raw_document(row: &Row<'_>) -> rusqlite::Result<RawDocument> {
    Ok(RawDocument {
        d_id: row.get("d_id")?,
        e_id: row.get("e_id")?,
        e_lhold: row.get("e_lhold")?,
        d_date: row.get("d_date")?,
        d_r_trigger: row.get("d_r_trigger")?,
        d_r_rule: row.get("d_r_rule")?,
        d_r_month: row.get("d_r_month")?,
        d_r_deletion: row.get("d_r_deletion")?,
        d_r_status: row.get("d_r_status")?,
    })
}

/// Reads `d_r_month` leniently. Values that are not a finite number become
/// `None` so the resolver can fall back instead of failing the whole read.
fn month_from_value(value: Value) -> Option<i64> {
    match value {
        Value::Integer(months) => Some(months),
        Value::Real(months) if months.is_finite() => Some(months.trunc() as i64),
        Value::Text(text) => {
            let trimmed = text.trim();
            trimmed.parse::<i64>().ok().or_else(|| {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|months| months.is_finite())
                    .map(|months| months.trunc() as i64)
            })
        }
        _ => None,
    }
}
