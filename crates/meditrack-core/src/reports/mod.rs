//! Read-only reports over a loaded [`Dataset`].
//!
//! Reports never touch the store. Load a [`Dataset`] once, then build as many
//! reports from it as needed. Text filters are case-insensitive substring
//! matches and an empty filter matches everything.

mod dashboard;
mod dispensations;
mod financial;
mod medications;
mod pagination;
mod patients;
mod prescriptions;

pub use dashboard::*;
pub use dispensations::*;
pub use financial::*;
pub use medications::*;
pub use pagination::*;
pub use patients::*;
pub use prescriptions::*;

use serde::{Deserialize, Serialize};

use crate::db::{DbResult, Store};
use crate::models::{Dispensation, Medicine, Patient, Prescription, NOT_AVAILABLE};
use crate::reconcile::{self, Reconciliation};

/// Every collection, as listed by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub patients: Vec<Patient>,
    pub medicines: Vec<Medicine>,
    pub prescriptions: Vec<Prescription>,
    pub dispensations: Vec<Dispensation>,
}

impl Dataset {
    pub fn load<S: Store + ?Sized>(store: &S) -> DbResult<Self> {
        Ok(Self {
            patients: store.list_patients()?,
            medicines: store.list_medicines()?,
            prescriptions: store.list_prescriptions()?,
            dispensations: store.list_dispensations()?,
        })
    }

    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    pub fn medicine(&self, id: &str) -> Option<&Medicine> {
        self.medicines.iter().find(|m| m.id == id)
    }

    /// Reconcile one prescription against the loaded dispensations.
    pub fn reconcile(&self, prescription: &Prescription) -> Reconciliation {
        reconcile::reconcile(prescription, &self.dispensations)
    }

    fn patient_name(&self, id: &str) -> String {
        self.patient(id)
            .map(|p| p.full_name.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    fn medicine_name(&self, id: &str) -> String {
        self.medicine(id)
            .map(Medicine::display_name)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}

/// Serialize a report as pretty JSON.
pub trait ToJson: Serialize {
    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn matches_filter(value: &str, filter: &str) -> bool {
    let filter = filter.trim();
    filter.is_empty() || value.to_lowercase().contains(&filter.to_lowercase())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;

    use super::Dataset;
    use crate::models::{
        Dispensation, Medicine, NewDispensation, NewMedicine, NewPatient, Patient, Prescription,
    };
    use crate::reconcile;

    pub fn patient(name: &str, doctor: &str) -> Patient {
        Patient::new(NewPatient {
            full_name: name.into(),
            birth_year: 1970,
            diagnosis: "I10 Essential hypertension".into(),
            attending_doctor: doctor.into(),
        })
    }

    pub fn medicine(mnn: &str, dosage: &str, packaging: i64, price: f64) -> Medicine {
        Medicine::new(NewMedicine {
            smmn_node_code: "21.20.10.000".into(),
            section: "1 (a)".into(),
            standardized_mnn: mnn.into(),
            trade_name: "-".into(),
            dosage_form: "TABLETS".into(),
            dosage: dosage.into(),
            characteristic: "-".into(),
            packaging,
            price,
        })
    }

    pub fn prescription(patient: &Patient, medicine: &Medicine, daily: f64) -> Prescription {
        let (mut rx, _) = reconcile::upsert_prescription(
            None,
            &patient.id,
            &medicine.id,
            daily,
            medicine.packaging,
        )
        .unwrap();
        rx.daily_dose = format!("{daily} per day");
        rx
    }

    pub fn dispensation(
        patient: &Patient,
        medicine: &Medicine,
        date: (i32, u32, u32),
        quantity: f64,
    ) -> Dispensation {
        Dispensation::new(NewDispensation {
            patient_id: patient.id.clone(),
            medicine_id: medicine.id.clone(),
            dispensation_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            quantity,
        })
    }

    /// Two patients, two medicines:
    /// - Sidorova takes enalapril 1/day (pack 20, 18.25/yr), fully dispensed
    /// - Abaeva takes agomelatine 2/day (pack 28, ~26.07/yr), 5 packs dispensed
    pub fn clinic() -> Dataset {
        let sidorova = patient("Sidorova Elena", "Achabaeva A.V.");
        let abaeva = patient("Abaeva Tatiana", "Petrov P.P.");
        let enalapril = medicine("ENALAPRIL", "10 mg", 20, 100.0);
        let agomelatine = medicine("AGOMELATINE", "25 mg", 28, 1000.0);

        Dataset {
            prescriptions: vec![
                prescription(&sidorova, &enalapril, 1.0),
                prescription(&abaeva, &agomelatine, 2.0),
            ],
            dispensations: vec![
                dispensation(&sidorova, &enalapril, (2024, 3, 20), 18.25),
                dispensation(&abaeva, &agomelatine, (2024, 1, 15), 5.0),
            ],
            patients: vec![sidorova, abaeva],
            medicines: vec![enalapril, agomelatine],
        }
    }
}
