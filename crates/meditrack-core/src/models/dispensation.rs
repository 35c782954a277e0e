//! Dispensation models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validation::{require_positive, require_text, ValidationError};

/// A single hand-out of packages to a patient. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dispensation {
    /// UUID generated on creation
    pub id: String,
    /// Patient ID
    pub patient_id: String,
    /// Medicine ID
    pub medicine_id: String,
    /// Calendar date of the hand-out
    pub dispensation_date: NaiveDate,
    /// Packages dispensed
    pub quantity: f64,
    /// Creation timestamp
    pub created_at: String,
}

/// Dispensation fields as submitted by a caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewDispensation {
    pub patient_id: String,
    pub medicine_id: String,
    pub dispensation_date: NaiveDate,
    pub quantity: f64,
}

impl NewDispensation {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("patient", &self.patient_id)?;
        require_text("medicine", &self.medicine_id)?;
        require_positive("quantity", self.quantity)?;
        Ok(())
    }
}

impl Dispensation {
    pub fn new(fields: NewDispensation) -> Self {
        Self {
            id: super::new_id(),
            patient_id: fields.patient_id,
            medicine_id: fields.medicine_id,
            dispensation_date: fields.dispensation_date,
            quantity: fields.quantity,
            created_at: super::now_rfc3339(),
        }
    }

    /// Whether this dispensation belongs to the given pair.
    pub fn is_for(&self, patient_id: &str, medicine_id: &str) -> bool {
        self.patient_id == patient_id && self.medicine_id == medicine_id
    }
}
