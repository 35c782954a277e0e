//! Requirement reconciliation.
//!
//! Derives a prescription's annual requirement (packages per year) from the
//! daily consumption and the medicine's package size, and reconciles the
//! cumulative dispensed quantity against it:
//!
//! ```text
//! annual_requirement = daily_consumption × 365 / packaging
//! remaining_need     = annual_requirement − Σ dispensed quantity
//! status             = Satisfied if remaining_need ≤ 0 else Outstanding
//! ```
//!
//! Everything here is pure and deterministic. The only rejected input is a
//! non-positive package size.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Dispensation, Prescription};

/// Days used to annualize a daily consumption.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Reconciliation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconcileError {
    #[error("Medicine packaging size must be positive, got {packaging}")]
    InvalidPackaging { packaging: i64 },
}

pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Whether a prescription's annual requirement has been covered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RequirementStatus {
    /// Dispensed quantity meets or exceeds the requirement
    Satisfied,
    /// Packages still need to be dispensed
    Outstanding,
}

impl RequirementStatus {
    pub fn is_satisfied(self) -> bool {
        matches!(self, RequirementStatus::Satisfied)
    }
}

/// Signal returned by [`upsert_prescription`] for caller notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Anything carrying a dispensed package quantity.
pub trait Dispensed {
    fn quantity(&self) -> f64;
}

impl Dispensed for f64 {
    fn quantity(&self) -> f64 {
        *self
    }
}

impl Dispensed for Dispensation {
    fn quantity(&self) -> f64 {
        self.quantity
    }
}

impl<T: Dispensed + ?Sized> Dispensed for &T {
    fn quantity(&self) -> f64 {
        (**self).quantity()
    }
}

/// Packages needed per year for a daily consumption.
pub fn compute_annual_requirement(daily_consumption: f64, packaging: i64) -> ReconcileResult<f64> {
    if packaging <= 0 {
        return Err(ReconcileError::InvalidPackaging { packaging });
    }
    Ok(daily_consumption * DAYS_PER_YEAR / packaging as f64)
}

/// Create or revise the prescription for a patient/medicine pair.
///
/// `existing` is the stored prescription for the pair, if any. A record for a
/// different pair is ignored and a new prescription is created instead. The
/// returned prescription keeps the existing `daily_dose` text; callers set it.
pub fn upsert_prescription(
    existing: Option<&Prescription>,
    patient_id: &str,
    medicine_id: &str,
    daily_consumption: f64,
    packaging: i64,
) -> ReconcileResult<(Prescription, UpsertOutcome)> {
    let annual_requirement = compute_annual_requirement(daily_consumption, packaging)?;
    let now = crate::models::now_rfc3339();

    match existing.filter(|p| p.is_for(patient_id, medicine_id)) {
        Some(current) => {
            let mut updated = current.clone();
            updated.daily_consumption = daily_consumption;
            updated.annual_requirement = annual_requirement;
            updated.updated_at = now;
            Ok((updated, UpsertOutcome::Updated))
        }
        None => Ok((
            Prescription {
                id: crate::models::new_id(),
                patient_id: patient_id.to_string(),
                medicine_id: medicine_id.to_string(),
                daily_dose: String::new(),
                daily_consumption,
                annual_requirement,
                created_at: now.clone(),
                updated_at: now,
            },
            UpsertOutcome::Created,
        )),
    }
}

/// Requirement left after subtracting everything dispensed. Not clamped.
pub fn compute_remaining_need<D: Dispensed>(annual_requirement: f64, dispensations: &[D]) -> f64 {
    annual_requirement - total_dispensed(dispensations)
}

/// Sum of dispensed quantities.
pub fn total_dispensed<D: Dispensed>(dispensations: &[D]) -> f64 {
    dispensations.iter().map(|d| d.quantity()).sum()
}

pub fn classify_status(remaining_need: f64) -> RequirementStatus {
    if remaining_need <= 0.0 {
        RequirementStatus::Satisfied
    } else {
        RequirementStatus::Outstanding
    }
}

/// Reconciled position of one prescription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reconciliation {
    pub prescription_id: String,
    pub patient_id: String,
    pub medicine_id: String,
    pub annual_requirement: f64,
    pub total_dispensed: f64,
    pub remaining_need: f64,
    pub status: RequirementStatus,
}

/// Reconcile a prescription against dispensation history.
///
/// Only dispensations for the prescription's pair are counted, so callers may
/// pass an unfiltered list.
pub fn reconcile(prescription: &Prescription, dispensations: &[Dispensation]) -> Reconciliation {
    let matching: Vec<&Dispensation> = dispensations
        .iter()
        .filter(|d| d.is_for(&prescription.patient_id, &prescription.medicine_id))
        .collect();

    let total = total_dispensed(&matching);
    let remaining_need = prescription.annual_requirement - total;

    Reconciliation {
        prescription_id: prescription.id.clone(),
        patient_id: prescription.patient_id.clone(),
        medicine_id: prescription.medicine_id.clone(),
        annual_requirement: prescription.annual_requirement,
        total_dispensed: total,
        remaining_need,
        status: classify_status(remaining_need),
    }
}
