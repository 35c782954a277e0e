//! Persistence layer for MediTrack Rx.
//!
//! Persistence is a single capability, [`Store`], made of one CRUD trait per
//! entity. [`Database`] implements it on SQLite; [`MemoryStore`] keeps the
//! same rules in memory. Patients and medicines are cascade roots: deleting
//! one removes the prescriptions and dispensations referencing it.

mod dispensations;
mod medicines;
mod memory;
mod patients;
mod prescriptions;
mod schema;

pub use memory::MemoryStore;
pub use schema::*;

use rusqlite::{Connection, ErrorCode};
use std::path::Path;
use thiserror::Error;

use crate::models::{Dispensation, Medicine, Patient, Prescription};

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Split constraint violations out of generic SQLite failures.
pub(crate) fn classify(err: rusqlite::Error) -> DbError {
    if let rusqlite::Error::SqliteFailure(code, message) = &err {
        if code.code == ErrorCode::ConstraintViolation {
            return DbError::Constraint(message.clone().unwrap_or_else(|| code.to_string()));
        }
    }
    DbError::Sqlite(err)
}

/// Patient records.
pub trait PatientStore {
    fn insert_patient(&mut self, patient: &Patient) -> DbResult<()>;
    fn update_patient(&mut self, patient: &Patient) -> DbResult<bool>;
    fn get_patient(&self, id: &str) -> DbResult<Option<Patient>>;
    /// All patients ordered by name.
    fn list_patients(&self) -> DbResult<Vec<Patient>>;
    /// Delete a patient together with its prescriptions and dispensations.
    fn delete_patient(&mut self, id: &str) -> DbResult<bool>;
}

/// Medicine records.
pub trait MedicineStore {
    fn insert_medicine(&mut self, medicine: &Medicine) -> DbResult<()>;
    fn update_medicine(&mut self, medicine: &Medicine) -> DbResult<bool>;
    fn get_medicine(&self, id: &str) -> DbResult<Option<Medicine>>;
    /// All medicines ordered by MNN, then dosage.
    fn list_medicines(&self) -> DbResult<Vec<Medicine>>;
    /// Delete a medicine together with its prescriptions and dispensations.
    fn delete_medicine(&mut self, id: &str) -> DbResult<bool>;
}

/// Prescription records, unique per patient/medicine pair.
pub trait PrescriptionStore {
    /// Fails with [`DbError::Constraint`] if the pair already has one.
    fn insert_prescription(&mut self, prescription: &Prescription) -> DbResult<()>;
    fn update_prescription(&mut self, prescription: &Prescription) -> DbResult<bool>;
    fn get_prescription(&self, id: &str) -> DbResult<Option<Prescription>>;
    /// All prescriptions, newest first.
    fn list_prescriptions(&self) -> DbResult<Vec<Prescription>>;
    fn delete_prescription(&mut self, id: &str) -> DbResult<bool>;

    fn find_prescription_by_pair(
        &self,
        patient_id: &str,
        medicine_id: &str,
    ) -> DbResult<Option<Prescription>> {
        Ok(self
            .list_prescriptions()?
            .into_iter()
            .find(|p| p.is_for(patient_id, medicine_id)))
    }

    fn prescriptions_for_medicine(&self, medicine_id: &str) -> DbResult<Vec<Prescription>> {
        Ok(self
            .list_prescriptions()?
            .into_iter()
            .filter(|p| p.medicine_id == medicine_id)
            .collect())
    }
}

/// Dispensation events. Append-only; removed only by cascade.
pub trait DispensationStore {
    fn insert_dispensation(&mut self, dispensation: &Dispensation) -> DbResult<()>;
    fn get_dispensation(&self, id: &str) -> DbResult<Option<Dispensation>>;
    /// All dispensations, most recent date first.
    fn list_dispensations(&self) -> DbResult<Vec<Dispensation>>;

    fn dispensations_for_pair(
        &self,
        patient_id: &str,
        medicine_id: &str,
    ) -> DbResult<Vec<Dispensation>> {
        Ok(self
            .list_dispensations()?
            .into_iter()
            .filter(|d| d.is_for(patient_id, medicine_id))
            .collect())
    }
}

/// Grouping of writes that land together or not at all.
pub trait Atomic {
    /// Run `f`; if it returns `Err`, every write it made is undone.
    fn atomically<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<DbError>;
}

/// The full persistence capability.
pub trait Store:
    PatientStore + MedicineStore + PrescriptionStore + DispensationStore + Atomic
{
}

impl<T> Store for T where
    T: PatientStore + MedicineStore + PrescriptionStore + DispensationStore + Atomic
{
}

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        tracing::info!(path = %path.display(), "Opened database");
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        tracing::debug!("Opened in-memory database");
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl Atomic for Database {
    fn atomically<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<DbError>,
    {
        self.conn
            .execute_batch("BEGIN IMMEDIATE")
            .map_err(DbError::from)?;
        match f(self) {
            Ok(value) => {
                self.conn.execute_batch("COMMIT").map_err(DbError::from)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = self.conn.execute_batch("ROLLBACK") {
                    tracing::warn!(error = %rollback, "Rollback failed");
                }
                Err(err)
            }
        }
    }
}
