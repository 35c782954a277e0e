//! MediTrack Rx Core Library
//!
//! Preferential-medication tracking for a regional pharmacy: who is prescribed
//! what, how many packages a year that implies, and how much is still owed.
//!
//! # Architecture
//!
//! ```text
//!   Patient ──┐                          ┌── Medicine (packaging, price)
//!             │                          │
//!             ▼                          ▼
//!        ┌────────────────────────────────────┐
//!        │  Prescription (one per pair)       │
//!        │  annual = daily × 365 / packaging  │
//!        └─────────────────┬──────────────────┘
//!                          │
//!            Dispensations (append-only log)
//!                          │
//!                          ▼
//!        ┌────────────────────────────────────┐
//!        │  Reconciliation                    │
//!        │  remaining = annual − Σ dispensed  │
//!        │  ≤ 0 → Satisfied, else Outstanding │
//!        └─────────────────┬──────────────────┘
//!                          │
//!        ┌─────────┬───────┴─────┬───────────┐
//!        ▼         ▼             ▼           ▼
//!    Dashboard  Prescriptions  Medications  Financial ...
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain records and boundary validation
//! - [`reconcile`]: Requirement arithmetic (pure functions)
//! - [`db`]: Store traits, SQLite database and in-memory store
//! - [`pharmacy`]: Application service over any store
//! - [`reports`]: Dashboard and tabular reports
//! - [`config`]: Runtime settings

pub mod config;
pub mod db;
pub mod models;
pub mod pharmacy;
pub mod reconcile;
pub mod reports;

// Re-export commonly used types
pub use config::CoreConfig;
pub use db::{Database, MemoryStore, Store};
pub use models::{
    Dispensation, Medicine, NewDispensation, NewMedicine, NewPatient, Patient, Prescription,
    PrescriptionRequest,
};
pub use pharmacy::{Pharmacy, PharmacyError};
pub use reconcile::{Reconciliation, RequirementStatus, UpsertOutcome};
pub use reports::{Dataset, ToJson};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

use db::{DispensationStore, MedicineStore, PatientStore, PrescriptionStore};

// =========================================================================
// Logging
// =========================================================================

/// Install the global `tracing` subscriber.
///
/// An unparsable filter falls back to [`config::DEFAULT_LOG_FILTER`]. Only the
/// first call installs a subscriber; later calls are no-ops.
#[uniffi::export]
pub fn init_logging(filter: String) {
    let filter = EnvFilter::try_new(&filter)
        .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER));
    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok() {
        tracing::info!(version = config::APP_VERSION, "{} core initialized", config::APP_NAME);
    }
}

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MediTrackError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<db::DbError> for MediTrackError {
    fn from(e: db::DbError) -> Self {
        MediTrackError::DatabaseError(e.to_string())
    }
}

impl From<PharmacyError> for MediTrackError {
    fn from(e: PharmacyError) -> Self {
        match e {
            PharmacyError::NotFound(what) => MediTrackError::NotFound(what),
            PharmacyError::Database(db) => db.into(),
            PharmacyError::Validation(v) => v.into(),
            PharmacyError::Reconcile(r) => r.into(),
        }
    }
}

impl From<models::ValidationError> for MediTrackError {
    fn from(e: models::ValidationError) -> Self {
        MediTrackError::InvalidInput(e.to_string())
    }
}

impl From<reconcile::ReconcileError> for MediTrackError {
    fn from(e: reconcile::ReconcileError) -> Self {
        MediTrackError::InvalidInput(e.to_string())
    }
}

impl From<config::ConfigError> for MediTrackError {
    fn from(e: config::ConfigError) -> Self {
        MediTrackError::InvalidInput(e.to_string())
    }
}

impl From<serde_json::Error> for MediTrackError {
    fn from(e: serde_json::Error) -> Self {
        MediTrackError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for MediTrackError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        MediTrackError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, MediTrackError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| MediTrackError::InvalidInput(format!("date {raw:?}: {e}")))
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<MediTrackCore>, MediTrackError> {
    let db = Database::open(&path)?;
    Ok(MediTrackCore::wrap(db, CoreConfig::default()))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<MediTrackCore>, MediTrackError> {
    let db = Database::open_in_memory()?;
    Ok(MediTrackCore::wrap(db, CoreConfig::default()))
}

/// Open using a JSON [`CoreConfig`]. Without `database_path` the database
/// lives in memory. Installs logging with the configured `log_filter`.
#[uniffi::export]
pub fn open_with_config(config_json: String) -> Result<Arc<MediTrackCore>, MediTrackError> {
    open_configured(CoreConfig::from_json(&config_json)?)
}

/// Open using defaults overlaid with `MEDITRACK_DB_PATH`,
/// `MEDITRACK_PAGE_SIZE` and `MEDITRACK_LOG` (or `RUST_LOG`).
#[uniffi::export]
pub fn open_from_env() -> Result<Arc<MediTrackCore>, MediTrackError> {
    open_configured(CoreConfig::from_env()?)
}

fn open_configured(config: CoreConfig) -> Result<Arc<MediTrackCore>, MediTrackError> {
    init_logging(config.log_filter.clone());
    let db = match &config.database_path {
        Some(path) => Database::open(path)?,
        None => Database::open_in_memory()?,
    };
    tracing::debug!(page_size = config.page_size, "Core configured");
    Ok(MediTrackCore::wrap(db, config))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
#[derive(uniffi::Object)]
pub struct MediTrackCore {
    db: Arc<Mutex<Database>>,
    config: CoreConfig,
}

impl MediTrackCore {
    fn wrap(db: Database, config: CoreConfig) -> Arc<Self> {
        Arc::new(Self {
            db: Arc::new(Mutex::new(db)),
            config,
        })
    }

    fn dataset(&self) -> Result<Dataset, MediTrackError> {
        let db = self.db.lock()?;
        Ok(Dataset::load(&*db)?)
    }
}

#[uniffi::export]
impl MediTrackCore {
    // =========================================================================
    // Patient Operations
    // =========================================================================

    pub fn register_patient(&self, input: FfiPatientInput) -> Result<FfiPatient, MediTrackError> {
        let mut db = self.db.lock()?;
        let patient = Pharmacy::new(&mut *db).register_patient(input.into())?;
        Ok(patient.into())
    }

    pub fn update_patient(
        &self,
        id: String,
        input: FfiPatientInput,
    ) -> Result<FfiPatient, MediTrackError> {
        let mut db = self.db.lock()?;
        let patient = Pharmacy::new(&mut *db).update_patient(&id, input.into())?;
        Ok(patient.into())
    }

    /// Delete a patient with their prescriptions and dispensations.
    pub fn remove_patient(&self, id: String) -> Result<(), MediTrackError> {
        let mut db = self.db.lock()?;
        Pharmacy::new(&mut *db).remove_patient(&id)?;
        Ok(())
    }

    pub fn get_patient(&self, id: String) -> Result<Option<FfiPatient>, MediTrackError> {
        let db = self.db.lock()?;
        Ok(db.get_patient(&id)?.map(|p| p.into()))
    }

    pub fn list_patients(&self) -> Result<Vec<FfiPatient>, MediTrackError> {
        let db = self.db.lock()?;
        Ok(db.list_patients()?.into_iter().map(|p| p.into()).collect())
    }

    // =========================================================================
    // Medicine Operations
    // =========================================================================

    pub fn add_medicine(&self, input: FfiMedicineInput) -> Result<FfiMedicine, MediTrackError> {
        let mut db = self.db.lock()?;
        let medicine = Pharmacy::new(&mut *db).add_medicine(input.into())?;
        Ok(medicine.into())
    }

    /// Edit a medicine; a packaging change recomputes its prescriptions.
    pub fn update_medicine(
        &self,
        id: String,
        input: FfiMedicineInput,
    ) -> Result<FfiMedicine, MediTrackError> {
        let mut db = self.db.lock()?;
        let medicine = Pharmacy::new(&mut *db).update_medicine(&id, input.into())?;
        Ok(medicine.into())
    }

    pub fn remove_medicine(&self, id: String) -> Result<(), MediTrackError> {
        let mut db = self.db.lock()?;
        Pharmacy::new(&mut *db).remove_medicine(&id)?;
        Ok(())
    }

    pub fn get_medicine(&self, id: String) -> Result<Option<FfiMedicine>, MediTrackError> {
        let db = self.db.lock()?;
        Ok(db.get_medicine(&id)?.map(|m| m.into()))
    }

    pub fn list_medicines(&self) -> Result<Vec<FfiMedicine>, MediTrackError> {
        let db = self.db.lock()?;
        Ok(db.list_medicines()?.into_iter().map(|m| m.into()).collect())
    }

    // =========================================================================
    // Prescription Operations
    // =========================================================================

    /// Create or revise the prescription for a patient/medicine pair.
    pub fn prescribe(
        &self,
        request: FfiPrescriptionRequest,
    ) -> Result<FfiPrescribeResult, MediTrackError> {
        let mut db = self.db.lock()?;
        let (prescription, outcome) = Pharmacy::new(&mut *db).prescribe(request.into())?;
        Ok(FfiPrescribeResult {
            prescription: prescription.into(),
            created: outcome == UpsertOutcome::Created,
        })
    }

    pub fn revise_prescription(
        &self,
        id: String,
        request: FfiPrescriptionRequest,
    ) -> Result<FfiPrescription, MediTrackError> {
        let mut db = self.db.lock()?;
        let prescription = Pharmacy::new(&mut *db).revise_prescription(&id, request.into())?;
        Ok(prescription.into())
    }

    pub fn cancel_prescription(&self, id: String) -> Result<(), MediTrackError> {
        let mut db = self.db.lock()?;
        Pharmacy::new(&mut *db).cancel_prescription(&id)?;
        Ok(())
    }

    pub fn list_prescriptions(&self) -> Result<Vec<FfiPrescription>, MediTrackError> {
        let db = self.db.lock()?;
        Ok(db.list_prescriptions()?.into_iter().map(|p| p.into()).collect())
    }

    // =========================================================================
    // Dispensation Operations
    // =========================================================================

    pub fn dispense(&self, input: FfiDispensationInput) -> Result<FfiDispensation, MediTrackError> {
        let fields = NewDispensation {
            dispensation_date: parse_date(&input.dispensation_date)?,
            patient_id: input.patient_id,
            medicine_id: input.medicine_id,
            quantity: input.quantity,
        };
        let mut db = self.db.lock()?;
        let dispensation = Pharmacy::new(&mut *db).dispense(fields)?;
        Ok(dispensation.into())
    }

    pub fn list_dispensations(&self) -> Result<Vec<FfiDispensation>, MediTrackError> {
        let db = self.db.lock()?;
        Ok(db.list_dispensations()?.into_iter().map(|d| d.into()).collect())
    }

    // =========================================================================
    // Reconciliation
    // =========================================================================

    pub fn reconcile_pair(
        &self,
        patient_id: String,
        medicine_id: String,
    ) -> Result<FfiReconciliation, MediTrackError> {
        let mut db = self.db.lock()?;
        let reconciled = Pharmacy::new(&mut *db).reconcile_pair(&patient_id, &medicine_id)?;
        Ok(reconciled.into())
    }

    // =========================================================================
    // Reports (JSON)
    // =========================================================================

    /// Dashboard for the month containing `today` (`YYYY-MM-DD`, default: local date).
    pub fn dashboard_json(&self, today: Option<String>) -> Result<String, MediTrackError> {
        let today = match today {
            Some(raw) => parse_date(&raw)?,
            None => chrono::Local::now().date_naive(),
        };
        let data = self.dataset()?;
        let dashboard = reports::Dashboard::build(&data, today, self.config.recent_limit);
        Ok(dashboard.to_json()?)
    }

    /// `filter_json` is a [`reports::PrescriptionFilter`]; `"{}"` matches all.
    pub fn prescriptions_report_json(&self, filter_json: String) -> Result<String, MediTrackError> {
        let filter: reports::PrescriptionFilter = serde_json::from_str(&filter_json)?;
        let report = reports::PrescriptionsReport::build(&self.dataset()?, &filter);
        Ok(report.to_json()?)
    }

    /// `filter_json` is a [`reports::DispensationFilter`]; `"{}"` matches all.
    pub fn dispensations_report_json(&self, filter_json: String) -> Result<String, MediTrackError> {
        let filter: reports::DispensationFilter = serde_json::from_str(&filter_json)?;
        let report = reports::DispensationsReport::build(&self.dataset()?, &filter);
        Ok(report.to_json()?)
    }

    pub fn medications_report_json(&self, mnn_filter: String) -> Result<String, MediTrackError> {
        let report = reports::MedicationsReport::build(&self.dataset()?, &mnn_filter);
        Ok(report.to_json()?)
    }

    pub fn financial_report_json(
        &self,
        medicine_filter: String,
        page: u32,
    ) -> Result<String, MediTrackError> {
        let report = reports::FinancialReport::build(
            &self.dataset()?,
            &medicine_filter,
            page as usize,
            self.config.page_size,
        );
        Ok(report.to_json()?)
    }

    pub fn patients_report_json(&self, name_filter: String) -> Result<String, MediTrackError> {
        let report = reports::PatientsReport::build(&self.dataset()?, &name_filter);
        Ok(report.to_json()?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient fields for create/update.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientInput {
    pub full_name: String,
    pub birth_year: i32,
    pub diagnosis: String,
    pub attending_doctor: String,
}

impl From<FfiPatientInput> for NewPatient {
    fn from(input: FfiPatientInput) -> Self {
        NewPatient {
            full_name: input.full_name,
            birth_year: input.birth_year,
            diagnosis: input.diagnosis,
            attending_doctor: input.attending_doctor,
        }
    }
}

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub full_name: String,
    pub birth_year: i32,
    pub diagnosis: String,
    pub attending_doctor: String,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            full_name: patient.full_name,
            birth_year: patient.birth_year,
            diagnosis: patient.diagnosis,
            attending_doctor: patient.attending_doctor,
        }
    }
}

/// FFI-safe medicine fields for create/update.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicineInput {
    pub smmn_node_code: String,
    pub section: String,
    pub standardized_mnn: String,
    pub trade_name: String,
    pub dosage_form: String,
    pub dosage: String,
    pub characteristic: String,
    pub packaging: i64,
    pub price: f64,
}

impl From<FfiMedicineInput> for NewMedicine {
    fn from(input: FfiMedicineInput) -> Self {
        NewMedicine {
            smmn_node_code: input.smmn_node_code,
            section: input.section,
            standardized_mnn: input.standardized_mnn,
            trade_name: input.trade_name,
            dosage_form: input.dosage_form,
            dosage: input.dosage,
            characteristic: input.characteristic,
            packaging: input.packaging,
            price: input.price,
        }
    }
}

/// FFI-safe medicine.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicine {
    pub id: String,
    pub smmn_node_code: String,
    pub section: String,
    pub standardized_mnn: String,
    pub trade_name: String,
    pub dosage_form: String,
    pub dosage: String,
    pub characteristic: String,
    pub packaging: i64,
    pub price: f64,
}

impl From<Medicine> for FfiMedicine {
    fn from(medicine: Medicine) -> Self {
        Self {
            id: medicine.id,
            smmn_node_code: medicine.smmn_node_code,
            section: medicine.section,
            standardized_mnn: medicine.standardized_mnn,
            trade_name: medicine.trade_name,
            dosage_form: medicine.dosage_form,
            dosage: medicine.dosage,
            characteristic: medicine.characteristic,
            packaging: medicine.packaging,
            price: medicine.price,
        }
    }
}

/// FFI-safe prescription request.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrescriptionRequest {
    pub patient_id: String,
    pub medicine_id: String,
    pub daily_dose: String,
    pub daily_consumption: f64,
}

impl From<FfiPrescriptionRequest> for PrescriptionRequest {
    fn from(request: FfiPrescriptionRequest) -> Self {
        PrescriptionRequest {
            patient_id: request.patient_id,
            medicine_id: request.medicine_id,
            daily_dose: request.daily_dose,
            daily_consumption: request.daily_consumption,
        }
    }
}

/// FFI-safe prescription.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrescription {
    pub id: String,
    pub patient_id: String,
    pub medicine_id: String,
    pub daily_dose: String,
    pub daily_consumption: f64,
    pub annual_requirement: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Prescription> for FfiPrescription {
    fn from(rx: Prescription) -> Self {
        Self {
            id: rx.id,
            patient_id: rx.patient_id,
            medicine_id: rx.medicine_id,
            daily_dose: rx.daily_dose,
            daily_consumption: rx.daily_consumption,
            annual_requirement: rx.annual_requirement,
            created_at: rx.created_at,
            updated_at: rx.updated_at,
        }
    }
}

/// Result of [`MediTrackCore::prescribe`].
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrescribeResult {
    pub prescription: FfiPrescription,
    /// False when an existing prescription for the pair was revised
    pub created: bool,
}

/// FFI-safe dispensation fields. The date is `YYYY-MM-DD`.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDispensationInput {
    pub patient_id: String,
    pub medicine_id: String,
    pub dispensation_date: String,
    pub quantity: f64,
}

/// FFI-safe dispensation.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDispensation {
    pub id: String,
    pub patient_id: String,
    pub medicine_id: String,
    pub dispensation_date: String,
    pub quantity: f64,
    pub created_at: String,
}

impl From<Dispensation> for FfiDispensation {
    fn from(d: Dispensation) -> Self {
        Self {
            id: d.id,
            patient_id: d.patient_id,
            medicine_id: d.medicine_id,
            dispensation_date: d.dispensation_date.format("%Y-%m-%d").to_string(),
            quantity: d.quantity,
            created_at: d.created_at,
        }
    }
}

/// FFI-safe reconciliation.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReconciliation {
    pub prescription_id: String,
    pub patient_id: String,
    pub medicine_id: String,
    pub annual_requirement: f64,
    pub total_dispensed: f64,
    pub remaining_need: f64,
    pub status: String,
}

impl From<Reconciliation> for FfiReconciliation {
    fn from(r: Reconciliation) -> Self {
        Self {
            prescription_id: r.prescription_id,
            patient_id: r.patient_id,
            medicine_id: r.medicine_id,
            annual_requirement: r.annual_requirement,
            total_dispensed: r.total_dispensed,
            remaining_need: r.remaining_need,
            status: format!("{:?}", r.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient_input() -> FfiPatientInput {
        FfiPatientInput {
            full_name: "Ivanov Ivan Ivanovich".into(),
            birth_year: 1980,
            diagnosis: "J45.9 Asthma".into(),
            attending_doctor: "Petrov P.P.".into(),
        }
    }

    fn medicine_input(packaging: i64) -> FfiMedicineInput {
        FfiMedicineInput {
            smmn_node_code: "N02BE01".into(),
            section: "Analgesics".into(),
            standardized_mnn: "PARACETAMOL".into(),
            trade_name: "Paracetamol".into(),
            dosage_form: "TABLETS".into(),
            dosage: "500 mg".into(),
            characteristic: "-".into(),
            packaging,
            price: 50.0,
        }
    }

    #[test]
    fn test_ffi_round_trip() {
        let core = open_database_in_memory().unwrap();
        let patient = core.register_patient(patient_input()).unwrap();
        let medicine = core.add_medicine(medicine_input(60)).unwrap();

        let result = core
            .prescribe(FfiPrescriptionRequest {
                patient_id: patient.id.clone(),
                medicine_id: medicine.id.clone(),
                daily_dose: "1 tab twice a day".into(),
                daily_consumption: 2.0,
            })
            .unwrap();
        assert!(result.created);

        core.dispense(FfiDispensationInput {
            patient_id: patient.id.clone(),
            medicine_id: medicine.id.clone(),
            dispensation_date: "2024-01-15".into(),
            quantity: 5.0,
        })
        .unwrap();

        let reconciled = core.reconcile_pair(patient.id, medicine.id).unwrap();
        assert_eq!(reconciled.status, "Outstanding");
        assert!((reconciled.remaining_need - 7.166_666_666_7).abs() < 1e-9);
    }

    #[test]
    fn test_error_mapping() {
        let core = open_database_in_memory().unwrap();

        let err = core.add_medicine(medicine_input(0)).unwrap_err();
        assert!(matches!(err, MediTrackError::InvalidInput(_)));

        let err = core.remove_patient("missing".into()).unwrap_err();
        assert!(matches!(err, MediTrackError::NotFound(_)));

        let err = core.prescriptions_report_json("not json".into()).unwrap_err();
        assert!(matches!(err, MediTrackError::SerializationError(_)));
    }

    #[test]
    fn test_bad_date_rejected() {
        let core = open_database_in_memory().unwrap();
        let patient = core.register_patient(patient_input()).unwrap();
        let medicine = core.add_medicine(medicine_input(10)).unwrap();

        let err = core
            .dispense(FfiDispensationInput {
                patient_id: patient.id,
                medicine_id: medicine.id,
                dispensation_date: "15.01.2024".into(),
                quantity: 1.0,
            })
            .unwrap_err();
        assert!(matches!(err, MediTrackError::InvalidInput(_)));
    }

    #[test]
    fn test_open_with_config_uses_page_size() {
        let core = open_with_config(r#"{"page_size": 1}"#.into()).unwrap();
        let patient = core.register_patient(patient_input()).unwrap();
        for packaging in [10, 20] {
            let medicine = core.add_medicine(medicine_input(packaging)).unwrap();
            core.prescribe(FfiPrescriptionRequest {
                patient_id: patient.id.clone(),
                medicine_id: medicine.id,
                daily_dose: "1 tab".into(),
                daily_consumption: 1.0,
            })
            .unwrap();
        }

        let json = core.financial_report_json(String::new(), 1).unwrap();
        let report: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(report["page"]["page_count"], 2);
        assert_eq!(report["page"]["items"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_open_with_config_installs_logging() {
        open_with_config(r#"{"log_filter": "warn"}"#.into()).unwrap();
        // the global subscriber is taken, so a second one is refused
        assert!(tracing_subscriber::fmt().try_init().is_err());
    }

    // The only test that touches the process environment.
    #[test]
    fn test_open_from_env() {
        std::env::remove_var(config::ENV_DB_PATH);
        std::env::set_var(config::ENV_PAGE_SIZE, "1");
        let opened = open_from_env();
        std::env::remove_var(config::ENV_PAGE_SIZE);

        let core = opened.unwrap();
        let patient = core.register_patient(patient_input()).unwrap();
        for packaging in [10, 20] {
            let medicine = core.add_medicine(medicine_input(packaging)).unwrap();
            core.prescribe(FfiPrescriptionRequest {
                patient_id: patient.id.clone(),
                medicine_id: medicine.id,
                daily_dose: "1 tab".into(),
                daily_consumption: 1.0,
            })
            .unwrap();
        }

        let json = core.financial_report_json(String::new(), 2).unwrap();
        let report: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(report["page"]["page_count"], 2);
        assert_eq!(report["page"]["items"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_dashboard_json() {
        let core = open_database_in_memory().unwrap();
        core.register_patient(patient_input()).unwrap();

        let json = core.dashboard_json(Some("2024-03-01".into())).unwrap();
        let dashboard: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(dashboard["total_patients"], 1);
    }
}
