//! SQLite-backed record store.
//!
//! Read operations serve request handling; the insert operations exist only
//! for the offline import path and for tests. Nothing mutates the tables at
//! request time.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use crate::schema::SCHEMA_SQL;
use crate::types::*;
use pharmlex_core::{Error, Result};

/// SQLite store over the compound, canonical_name, synonym and product tables.
pub struct RecordStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl RecordStore {
    /// Open or create the store at `db_path`.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&db_path).map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };

        let count = store.count_compounds()?;
        info!(
            "RecordStore initialized: {} compounds, path={}",
            count,
            store.db_path.display()
        );
        Ok(store)
    }

    // ---------------------------------------------------------------
    // Read operations
    // ---------------------------------------------------------------

    /// Fetch a compound by id.
    pub fn get_compound(&self, id: &str) -> Result<Option<Compound>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT id, drug_class, mechanism, indication, pharmacodynamics
                 FROM compound WHERE id = ?1",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        stmt.query_row(params![id], |row| {
            Ok(Compound {
                id: row.get(0)?,
                drug_class: row.get(1)?,
                mechanism: row.get(2)?,
                indication: row.get(3)?,
                pharmacodynamics: row.get(4)?,
            })
        })
        .optional()
        .map_err(|e| Error::Database(e.to_string()))
    }

    /// Fetch the canonical name of a compound.
    pub fn get_canonical_name(&self, id: &str) -> Result<Option<CanonicalName>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached("SELECT id, display_name FROM canonical_name WHERE id = ?1")
            .map_err(|e| Error::Database(e.to_string()))?;
        stmt.query_row(params![id], |row| {
            Ok(CanonicalName {
                id: row.get(0)?,
                display_name: row.get(1)?,
            })
        })
        .optional()
        .map_err(|e| Error::Database(e.to_string()))
    }

    /// List synonyms of a compound in insertion order.
    pub fn list_synonyms(&self, id: &str) -> Result<Vec<String>> {
        self.list_texts("SELECT text FROM synonym WHERE id = ?1 ORDER BY rowid", id)
    }

    /// List marketed products of a compound in insertion order.
    pub fn list_products(&self, id: &str) -> Result<Vec<String>> {
        self.list_texts("SELECT text FROM product WHERE id = ?1 ORDER BY rowid", id)
    }

    fn list_texts(&self, sql: &str, id: &str) -> Result<Vec<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(sql)
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![id], |row| row.get::<_, String>(0))
            .map_err(|e| Error::Database(e.to_string()))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows)
    }

    /// Bulk listing of every name variant, used once to build the pattern
    /// index: canonical names, then synonyms, then products.
    pub fn list_name_rows(&self) -> Result<Vec<NameRow>> {
        let conn = self.conn.lock();
        let mut rows = Vec::new();

        let mut push_all = |sql: &str, kind: NameKind| -> Result<()> {
            let mut stmt = conn
                .prepare(sql)
                .map_err(|e| Error::Database(e.to_string()))?;
            let mapped = stmt
                .query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })
                .map_err(|e| Error::Database(e.to_string()))?;
            for item in mapped {
                let (id, text) = item.map_err(|e| Error::Database(e.to_string()))?;
                rows.push(NameRow { id, text, kind });
            }
            Ok(())
        };

        push_all(
            "SELECT id, display_name FROM canonical_name ORDER BY id",
            NameKind::Canonical,
        )?;
        push_all(
            "SELECT id, text FROM synonym ORDER BY rowid",
            NameKind::Synonym,
        )?;
        push_all(
            "SELECT id, text FROM product ORDER BY rowid",
            NameKind::Product,
        )?;
        Ok(rows)
    }

    /// Count total compounds.
    pub fn count_compounds(&self) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM compound", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))
    }

    // ---------------------------------------------------------------
    // Import (offline only)
    // ---------------------------------------------------------------

    /// Insert one compound with all of its names inside a transaction.
    pub fn insert_record(&self, record: &CompoundRecord) -> Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn
            .transaction()
            .map_err(|e| Error::Database(e.to_string()))?;

        tx.execute(
            "INSERT INTO compound (id, drug_class, mechanism, indication, pharmacodynamics)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.id,
                record.drug_class,
                record.mechanism,
                record.indication,
                record.pharmacodynamics
            ],
        )
        .map_err(|e| Error::Database(e.to_string()))?;

        tx.execute(
            "INSERT INTO canonical_name (id, display_name) VALUES (?1, ?2)",
            params![record.id, record.display_name],
        )
        .map_err(|e| Error::Database(e.to_string()))?;

        for synonym in &record.synonyms {
            tx.execute(
                "INSERT INTO synonym (id, text) VALUES (?1, ?2)",
                params![record.id, synonym],
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        }
        for product in &record.products {
            tx.execute(
                "INSERT INTO product (id, text) VALUES (?1, ?2)",
                params![record.id, product],
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        }

        tx.commit().map_err(|e| Error::Database(e.to_string()))
    }

    /// Import a batch of records. Returns how many were inserted.
    pub fn import_records(&self, records: &[CompoundRecord]) -> Result<usize> {
        for record in records {
            self.insert_record(record)?;
        }
        info!("Imported {} compound records", records.len());
        Ok(records.len())
    }

    /// Import records from a JSON array string (the fixture file format).
    pub fn import_json(&self, json: &str) -> Result<usize> {
        let records: Vec<CompoundRecord> = serde_json::from_str(json)?;
        self.import_records(&records)
    }
}
