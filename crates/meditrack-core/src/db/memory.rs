//! In-memory store with the same rules as the SQLite schema.

use std::cmp::Reverse;

use super::{
    Atomic, DbError, DbResult, DispensationStore, MedicineStore, PatientStore, PrescriptionStore,
};
use crate::models::{Dispensation, Medicine, Patient, Prescription};

/// Store backed by plain vectors, kept in insertion order.
///
/// Enforces unique IDs, one prescription per patient/medicine pair, existing
/// parents for prescriptions and dispensations, and cascade deletion from
/// patients and medicines.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    patients: Vec<Patient>,
    medicines: Vec<Medicine>,
    prescriptions: Vec<Prescription>,
    dispensations: Vec<Dispensation>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_parents(&self, patient_id: &str, medicine_id: &str) -> DbResult<()> {
        if !self.patients.iter().any(|p| p.id == patient_id) {
            return Err(DbError::Constraint(format!("unknown patient {patient_id}")));
        }
        if !self.medicines.iter().any(|m| m.id == medicine_id) {
            return Err(DbError::Constraint(format!("unknown medicine {medicine_id}")));
        }
        Ok(())
    }

    fn check_pair_free(&self, prescription: &Prescription) -> DbResult<()> {
        let taken = self.prescriptions.iter().any(|p| {
            p.id != prescription.id && p.is_for(&prescription.patient_id, &prescription.medicine_id)
        });
        if taken {
            return Err(DbError::Constraint(format!(
                "prescription already exists for patient {} and medicine {}",
                prescription.patient_id, prescription.medicine_id
            )));
        }
        Ok(())
    }
}

impl Atomic for MemoryStore {
    fn atomically<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<DbError>,
    {
        let snapshot = self.clone();
        let result = f(self);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }
}

fn duplicate_id(id: &str) -> DbError {
    DbError::Constraint(format!("duplicate id {id}"))
}

impl PatientStore for MemoryStore {
    fn insert_patient(&mut self, patient: &Patient) -> DbResult<()> {
        if self.patients.iter().any(|p| p.id == patient.id) {
            return Err(duplicate_id(&patient.id));
        }
        self.patients.push(patient.clone());
        Ok(())
    }

    fn update_patient(&mut self, patient: &Patient) -> DbResult<bool> {
        match self.patients.iter_mut().find(|p| p.id == patient.id) {
            Some(slot) => {
                *slot = patient.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn get_patient(&self, id: &str) -> DbResult<Option<Patient>> {
        Ok(self.patients.iter().find(|p| p.id == id).cloned())
    }

    fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let mut patients = self.patients.clone();
        patients.sort_by(|a, b| {
            a.full_name
                .cmp(&b.full_name)
                .then(a.birth_year.cmp(&b.birth_year))
        });
        Ok(patients)
    }

    fn delete_patient(&mut self, id: &str) -> DbResult<bool> {
        let before = self.patients.len();
        self.patients.retain(|p| p.id != id);
        if self.patients.len() == before {
            return Ok(false);
        }
        self.prescriptions.retain(|p| p.patient_id != id);
        self.dispensations.retain(|d| d.patient_id != id);
        tracing::debug!(patient_id = id, "Deleted patient with dependent records");
        Ok(true)
    }
}

impl MedicineStore for MemoryStore {
    fn insert_medicine(&mut self, medicine: &Medicine) -> DbResult<()> {
        if self.medicines.iter().any(|m| m.id == medicine.id) {
            return Err(duplicate_id(&medicine.id));
        }
        self.medicines.push(medicine.clone());
        Ok(())
    }

    fn update_medicine(&mut self, medicine: &Medicine) -> DbResult<bool> {
        match self.medicines.iter_mut().find(|m| m.id == medicine.id) {
            Some(slot) => {
                *slot = medicine.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn get_medicine(&self, id: &str) -> DbResult<Option<Medicine>> {
        Ok(self.medicines.iter().find(|m| m.id == id).cloned())
    }

    fn list_medicines(&self) -> DbResult<Vec<Medicine>> {
        let mut medicines = self.medicines.clone();
        medicines.sort_by(|a, b| {
            a.standardized_mnn
                .cmp(&b.standardized_mnn)
                .then_with(|| a.dosage.cmp(&b.dosage))
        });
        Ok(medicines)
    }

    fn delete_medicine(&mut self, id: &str) -> DbResult<bool> {
        let before = self.medicines.len();
        self.medicines.retain(|m| m.id != id);
        if self.medicines.len() == before {
            return Ok(false);
        }
        self.prescriptions.retain(|p| p.medicine_id != id);
        self.dispensations.retain(|d| d.medicine_id != id);
        tracing::debug!(medicine_id = id, "Deleted medicine with dependent records");
        Ok(true)
    }
}

impl PrescriptionStore for MemoryStore {
    fn insert_prescription(&mut self, prescription: &Prescription) -> DbResult<()> {
        if self.prescriptions.iter().any(|p| p.id == prescription.id) {
            return Err(duplicate_id(&prescription.id));
        }
        self.check_parents(&prescription.patient_id, &prescription.medicine_id)?;
        self.check_pair_free(prescription)?;
        self.prescriptions.push(prescription.clone());
        Ok(())
    }

    fn update_prescription(&mut self, prescription: &Prescription) -> DbResult<bool> {
        if !self.prescriptions.iter().any(|p| p.id == prescription.id) {
            return Ok(false);
        }
        self.check_parents(&prescription.patient_id, &prescription.medicine_id)?;
        self.check_pair_free(prescription)?;
        if let Some(slot) = self.prescriptions.iter_mut().find(|p| p.id == prescription.id) {
            *slot = prescription.clone();
        }
        Ok(true)
    }

    fn get_prescription(&self, id: &str) -> DbResult<Option<Prescription>> {
        Ok(self.prescriptions.iter().find(|p| p.id == id).cloned())
    }

    fn list_prescriptions(&self) -> DbResult<Vec<Prescription>> {
        // Newest first; later insertions win ties like rowid in SQLite.
        let mut prescriptions: Vec<Prescription> =
            self.prescriptions.iter().rev().cloned().collect();
        prescriptions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(prescriptions)
    }

    fn delete_prescription(&mut self, id: &str) -> DbResult<bool> {
        let before = self.prescriptions.len();
        self.prescriptions.retain(|p| p.id != id);
        Ok(self.prescriptions.len() < before)
    }
}

impl DispensationStore for MemoryStore {
    fn insert_dispensation(&mut self, dispensation: &Dispensation) -> DbResult<()> {
        if self.dispensations.iter().any(|d| d.id == dispensation.id) {
            return Err(duplicate_id(&dispensation.id));
        }
        self.check_parents(&dispensation.patient_id, &dispensation.medicine_id)?;
        if !(dispensation.quantity > 0.0) {
            return Err(DbError::Constraint(format!(
                "quantity must be positive, got {}",
                dispensation.quantity
            )));
        }
        self.dispensations.push(dispensation.clone());
        Ok(())
    }

    fn get_dispensation(&self, id: &str) -> DbResult<Option<Dispensation>> {
        Ok(self.dispensations.iter().find(|d| d.id == id).cloned())
    }

    fn list_dispensations(&self) -> DbResult<Vec<Dispensation>> {
        let mut dispensations = self.dispensations.clone();
        dispensations.sort_by_key(|d| Reverse((d.dispensation_date, d.created_at.clone())));
        Ok(dispensations)
    }
}
