//! SQLite-backed record store.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use super::{RecordStore, Result, StoredPatient};
use crate::error::StoreError;
use crate::models::record::PatientRecord;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS patients (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL,
        dob         TEXT NOT NULL,
        created_at  TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS forms_data (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        patient_id  INTEGER NOT NULL REFERENCES patients(id),
        form_json   TEXT NOT NULL,
        created_at  TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_forms_data_patient ON forms_data(patient_id);
"#;

/// Stores each record as a `patients` row plus its JSON document in
/// `forms_data`.
pub struct SqliteRecordStore {
    conn: Connection,
}

impl SqliteRecordStore {
    /// Open (or create) the database file and ensure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        debug!("Opened record store at {}", path.display());
        Self::with_connection(conn)
    }

    /// Private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Latest record document stored for `patient_id`.
    pub fn load_record(&self, patient_id: i64) -> Result<PatientRecord> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT form_json FROM forms_data
                 WHERE patient_id = ?1 ORDER BY id DESC LIMIT 1",
                params![patient_id],
                |row| row.get(0),
            )
            .optional()?;

        let json = json.ok_or(StoreError::NotFound(patient_id))?;
        Ok(PatientRecord::from_json(&json)?)
    }

    /// All stored patients, oldest first.
    pub fn list_patients(&self) -> Result<Vec<StoredPatient>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, dob, created_at FROM patients ORDER BY id")?;
        let patients = stmt
            .query_map([], |row| {
                Ok(StoredPatient {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    dob: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(patients)
    }
}

impl RecordStore for SqliteRecordStore {
    fn save(&self, record: &PatientRecord) -> Result<i64> {
        let form_json = record.to_json()?;
        let created_at = Utc::now().to_rfc3339();

        // Dropping the transaction without commit rolls back both inserts.
        let tx = self.conn.unchecked_transaction()?;

        let patient_id: i64 = tx.query_row(
            "INSERT INTO patients (name, dob, created_at) VALUES (?1, ?2, ?3) RETURNING id",
            params![record.patient_name, record.dob, created_at],
            |row| row.get(0),
        )?;

        tx.execute(
            "INSERT INTO forms_data (patient_id, form_json, created_at) VALUES (?1, ?2, ?3)",
            params![patient_id, form_json, created_at],
        )?;

        tx.commit()?;

        info!("Stored record for patient {}", patient_id);
        Ok(patient_id)
    }
}
