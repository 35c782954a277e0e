//! Per-medicine demand summary.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{matches_filter, Dataset, ToJson};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicationRow {
    pub medicine_id: String,
    pub smmn_node_code: String,
    pub standardized_mnn: String,
    pub trade_name: String,
    pub dosage_form: String,
    pub dosage: String,
    pub packaging: i64,
    /// Distinct patients with a prescription for this medicine
    pub patient_count: usize,
    /// Sum of annual requirements, in packages
    pub total_annual_requirement: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicationsReport {
    pub rows: Vec<MedicationRow>,
}

impl MedicationsReport {
    /// One row per medicine whose MNN matches `mnn_filter`, in catalog order.
    pub fn build(data: &Dataset, mnn_filter: &str) -> Self {
        let rows = data
            .medicines
            .iter()
            .filter(|m| matches_filter(&m.standardized_mnn, mnn_filter))
            .map(|medicine| {
                let prescriptions = data
                    .prescriptions
                    .iter()
                    .filter(|rx| rx.medicine_id == medicine.id);

                let mut patients = HashSet::new();
                let mut total_annual_requirement = 0.0;
                for rx in prescriptions {
                    patients.insert(rx.patient_id.as_str());
                    total_annual_requirement += rx.annual_requirement;
                }

                MedicationRow {
                    medicine_id: medicine.id.clone(),
                    smmn_node_code: medicine.smmn_node_code.clone(),
                    standardized_mnn: medicine.standardized_mnn.clone(),
                    trade_name: medicine.trade_name.clone(),
                    dosage_form: medicine.dosage_form.clone(),
                    dosage: medicine.dosage.clone(),
                    packaging: medicine.packaging,
                    patient_count: patients.len(),
                    total_annual_requirement,
                }
            })
            .collect();

        Self { rows }
    }
}

impl ToJson for MedicationsReport {}
