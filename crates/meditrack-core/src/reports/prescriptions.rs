//! Prescriptions report with reconciled need per row.

use serde::{Deserialize, Serialize};

use super::{matches_filter, Dataset, ToJson};
use crate::models::NOT_AVAILABLE;
use crate::reconcile::RequirementStatus;

/// Which reconciliation states to include.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    /// Remaining need at or below zero
    Met,
    Unmet,
}

impl StatusFilter {
    fn accepts(self, status: RequirementStatus) -> bool {
        match self {
            Self::All => true,
            Self::Met => status.is_satisfied(),
            Self::Unmet => !status.is_satisfied(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrescriptionFilter {
    pub patient: String,
    pub doctor: String,
    pub medicine: String,
    pub status: StatusFilter,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionRow {
    pub prescription_id: String,
    pub patient_name: String,
    pub attending_doctor: String,
    pub diagnosis: String,
    pub medicine_name: String,
    pub daily_dose: String,
    pub annual_requirement: f64,
    pub total_dispensed: f64,
    pub remaining_need: f64,
    pub status: RequirementStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionsReport {
    pub rows: Vec<PrescriptionRow>,
}

impl PrescriptionsReport {
    /// Rows sorted by patient name.
    pub fn build(data: &Dataset, filter: &PrescriptionFilter) -> Self {
        let mut rows: Vec<PrescriptionRow> = data
            .prescriptions
            .iter()
            .map(|rx| {
                let reconciled = data.reconcile(rx);
                let patient = data.patient(&rx.patient_id);
                PrescriptionRow {
                    prescription_id: rx.id.clone(),
                    patient_name: data.patient_name(&rx.patient_id),
                    attending_doctor: patient
                        .map_or(NOT_AVAILABLE, |p| p.attending_doctor.as_str())
                        .to_string(),
                    diagnosis: patient
                        .map_or(NOT_AVAILABLE, |p| p.diagnosis.as_str())
                        .to_string(),
                    medicine_name: data.medicine_name(&rx.medicine_id),
                    daily_dose: rx.daily_dose.clone(),
                    annual_requirement: rx.annual_requirement,
                    total_dispensed: reconciled.total_dispensed,
                    remaining_need: reconciled.remaining_need,
                    status: reconciled.status,
                }
            })
            .filter(|row| {
                matches_filter(&row.patient_name, &filter.patient)
                    && matches_filter(&row.attending_doctor, &filter.doctor)
                    && matches_filter(&row.medicine_name, &filter.medicine)
                    && filter.status.accepts(row.status)
            })
            .collect();

        rows.sort_by(|a, b| a.patient_name.cmp(&b.patient_name));
        Self { rows }
    }
}

impl ToJson for PrescriptionsReport {}
