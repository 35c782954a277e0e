//! Dashboard summary.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{Dataset, ToJson};

/// Headline counts plus the latest prescriptions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dashboard {
    pub total_patients: usize,
    pub total_medicines: usize,
    pub active_prescriptions: usize,
    /// Dispensations dated in the calendar month of `today`
    pub dispensations_this_month: usize,
    pub recent_prescriptions: Vec<RecentPrescription>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentPrescription {
    pub prescription_id: String,
    pub patient_name: String,
    pub medicine_name: String,
    pub daily_dose: String,
    pub annual_requirement: f64,
    pub created_at: String,
}

impl Dashboard {
    pub fn build(data: &Dataset, today: NaiveDate, recent_limit: usize) -> Self {
        let dispensations_this_month = data
            .dispensations
            .iter()
            .filter(|d| {
                d.dispensation_date.year() == today.year()
                    && d.dispensation_date.month() == today.month()
            })
            .count();

        let mut newest: Vec<_> = data.prescriptions.iter().collect();
        newest.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let recent_prescriptions = newest
            .into_iter()
            .take(recent_limit)
            .map(|rx| RecentPrescription {
                prescription_id: rx.id.clone(),
                patient_name: data.patient_name(&rx.patient_id),
                medicine_name: data.medicine_name(&rx.medicine_id),
                daily_dose: rx.daily_dose.clone(),
                annual_requirement: rx.annual_requirement,
                created_at: rx.created_at.clone(),
            })
            .collect();

        Self {
            total_patients: data.patients.len(),
            total_medicines: data.medicines.len(),
            active_prescriptions: data.prescriptions.len(),
            dispensations_this_month,
            recent_prescriptions,
        }
    }
}

impl ToJson for Dashboard {}
