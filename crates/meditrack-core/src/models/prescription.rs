//! Prescription models.

use serde::{Deserialize, Serialize};

use super::validation::{require_positive, require_text, ValidationError};

/// A standing prescription of one medicine for one patient.
///
/// At most one prescription exists per `(patient_id, medicine_id)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prescription {
    /// UUID generated on creation
    pub id: String,
    /// Patient ID
    pub patient_id: String,
    /// Medicine ID
    pub medicine_id: String,
    /// Dosage instruction as written by the clinician
    pub daily_dose: String,
    /// Dose units consumed per day
    pub daily_consumption: f64,
    /// Packages required per year, derived from consumption and packaging
    pub annual_requirement: f64,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Prescription {
    /// Whether this prescription belongs to the given pair.
    pub fn is_for(&self, patient_id: &str, medicine_id: &str) -> bool {
        self.patient_id == patient_id && self.medicine_id == medicine_id
    }
}

/// A dosage submission for a patient/medicine pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionRequest {
    pub patient_id: String,
    pub medicine_id: String,
    pub daily_dose: String,
    pub daily_consumption: f64,
}

impl PrescriptionRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("patient", &self.patient_id)?;
        require_text("medicine", &self.medicine_id)?;
        require_text("daily dose", &self.daily_dose)?;
        require_positive("daily consumption", self.daily_consumption)?;
        Ok(())
    }
}
