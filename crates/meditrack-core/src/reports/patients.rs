//! Patients with their prescriptions.

use serde::{Deserialize, Serialize};

use super::{matches_filter, Dataset, ToJson};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientPrescription {
    pub prescription_id: String,
    pub medicine_name: String,
    pub daily_dose: String,
    pub annual_requirement: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientEntry {
    pub patient_id: String,
    pub full_name: String,
    pub birth_year: i32,
    pub diagnosis: String,
    pub attending_doctor: String,
    pub prescriptions: Vec<PatientPrescription>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientsReport {
    pub patients: Vec<PatientEntry>,
}

impl PatientsReport {
    pub fn build(data: &Dataset, name_filter: &str) -> Self {
        let patients = data
            .patients
            .iter()
            .filter(|p| matches_filter(&p.full_name, name_filter))
            .map(|patient| PatientEntry {
                patient_id: patient.id.clone(),
                full_name: patient.full_name.clone(),
                birth_year: patient.birth_year,
                diagnosis: patient.diagnosis.clone(),
                attending_doctor: patient.attending_doctor.clone(),
                prescriptions: data
                    .prescriptions
                    .iter()
                    .filter(|rx| rx.patient_id == patient.id)
                    .map(|rx| PatientPrescription {
                        prescription_id: rx.id.clone(),
                        medicine_name: data.medicine_name(&rx.medicine_id),
                        daily_dose: rx.daily_dose.clone(),
                        annual_requirement: rx.annual_requirement,
                    })
                    .collect(),
            })
            .collect();

        Self { patients }
    }
}

impl ToJson for PatientsReport {}
