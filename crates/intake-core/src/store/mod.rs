//! Persistence of parsed intake records.

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRecordStore;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::models::record::PatientRecord;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Destination for parsed records.
///
/// `save` writes the patient row and the full record document atomically and
/// returns the generated patient id. On error nothing is committed.
pub trait RecordStore {
    fn save(&self, record: &PatientRecord) -> Result<i64>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn save(&self, record: &PatientRecord) -> Result<i64> {
        (**self).save(record)
    }
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn save(&self, record: &PatientRecord) -> Result<i64> {
        (**self).save(record)
    }
}

/// Summary row of a stored patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPatient {
    pub id: i64,
    pub name: String,
    pub dob: String,
    /// RFC 3339 timestamp of the insert.
    pub created_at: String,
}
