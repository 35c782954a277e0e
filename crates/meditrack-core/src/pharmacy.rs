//! Application service tying validation, reconciliation and persistence.
//!
//! Every write goes through [`Pharmacy`]: input records are validated before
//! they reach the reconciler, and derived fields are recomputed whenever their
//! inputs change.

use thiserror::Error;

use crate::db::{DbError, Store};
use crate::models::{
    Dispensation, Medicine, NewDispensation, NewMedicine, NewPatient, Patient, Prescription,
    PrescriptionRequest, ValidationError,
};
use crate::reconcile::{self, ReconcileError, Reconciliation, UpsertOutcome};
use crate::reports::Dataset;

/// Service errors.
#[derive(Error, Debug)]
pub enum PharmacyError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type PharmacyResult<T> = Result<T, PharmacyError>;

/// Pharmacy operations over any [`Store`].
pub struct Pharmacy<'a, S: Store> {
    store: &'a mut S,
}

impl<'a, S: Store> Pharmacy<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    // =========================================================================
    // Patients
    // =========================================================================

    pub fn register_patient(&mut self, fields: NewPatient) -> PharmacyResult<Patient> {
        fields.validate()?;
        let patient = Patient::new(fields);
        self.store.insert_patient(&patient)?;
        tracing::info!(patient_id = %patient.id, "Registered patient");
        Ok(patient)
    }

    pub fn update_patient(&mut self, id: &str, fields: NewPatient) -> PharmacyResult<Patient> {
        fields.validate()?;
        let mut patient = self.require_patient(id)?;
        patient.apply(fields);
        self.store.update_patient(&patient)?;
        Ok(patient)
    }

    /// Remove a patient along with their prescriptions and dispensations.
    pub fn remove_patient(&mut self, id: &str) -> PharmacyResult<()> {
        if !self.store.delete_patient(id)? {
            return Err(PharmacyError::NotFound(format!("patient {id}")));
        }
        Ok(())
    }

    // =========================================================================
    // Medicines
    // =========================================================================

    pub fn add_medicine(&mut self, fields: NewMedicine) -> PharmacyResult<Medicine> {
        fields.validate()?;
        let medicine = Medicine::new(fields);
        self.store.insert_medicine(&medicine)?;
        tracing::info!(
            medicine_id = %medicine.id,
            name = %medicine.display_name(),
            "Added medicine"
        );
        Ok(medicine)
    }

    /// Edit a medicine. A packaging change recomputes the annual requirement
    /// of every prescription referencing it; the edit and the recomputation
    /// are stored together or not at all.
    pub fn update_medicine(&mut self, id: &str, fields: NewMedicine) -> PharmacyResult<Medicine> {
        fields.validate()?;
        let mut medicine = self.require_medicine(id)?;
        let packaging_changed = medicine.apply(fields);

        self.store.atomically(|store| -> PharmacyResult<()> {
            store.update_medicine(&medicine)?;
            if packaging_changed {
                let recomputed = recompute_requirements(store, &medicine)?;
                tracing::debug!(
                    medicine_id = %medicine.id,
                    packaging = medicine.packaging,
                    recomputed,
                    "Recomputed annual requirements after packaging change"
                );
            }
            Ok(())
        })?;
        Ok(medicine)
    }

    /// Remove a medicine along with its prescriptions and dispensations.
    pub fn remove_medicine(&mut self, id: &str) -> PharmacyResult<()> {
        if !self.store.delete_medicine(id)? {
            return Err(PharmacyError::NotFound(format!("medicine {id}")));
        }
        Ok(())
    }

    // =========================================================================
    // Prescriptions
    // =========================================================================

    /// Submit a dosage for a patient/medicine pair.
    ///
    /// Creates the pair's prescription, or revises it in place if one exists.
    pub fn prescribe(
        &mut self,
        request: PrescriptionRequest,
    ) -> PharmacyResult<(Prescription, UpsertOutcome)> {
        request.validate()?;
        self.require_patient(&request.patient_id)?;
        let medicine = self.require_medicine(&request.medicine_id)?;
        warn_unusable_packaging(&medicine);

        let existing = self
            .store
            .find_prescription_by_pair(&request.patient_id, &request.medicine_id)?;
        let (mut prescription, outcome) = reconcile::upsert_prescription(
            existing.as_ref(),
            &request.patient_id,
            &request.medicine_id,
            request.daily_consumption,
            medicine.packaging,
        )?;
        prescription.daily_dose = request.daily_dose;

        match outcome {
            UpsertOutcome::Created => self.store.insert_prescription(&prescription)?,
            UpsertOutcome::Updated => {
                self.store.update_prescription(&prescription)?;
            }
        }

        tracing::info!(
            prescription_id = %prescription.id,
            ?outcome,
            annual_requirement = prescription.annual_requirement,
            "Saved prescription"
        );
        Ok((prescription, outcome))
    }

    /// Edit a prescription by ID, possibly moving it to another medicine.
    pub fn revise_prescription(
        &mut self,
        id: &str,
        request: PrescriptionRequest,
    ) -> PharmacyResult<Prescription> {
        request.validate()?;
        let mut prescription = self
            .store
            .get_prescription(id)?
            .ok_or_else(|| PharmacyError::NotFound(format!("prescription {id}")))?;
        self.require_patient(&request.patient_id)?;
        let medicine = self.require_medicine(&request.medicine_id)?;
        warn_unusable_packaging(&medicine);

        prescription.annual_requirement =
            reconcile::compute_annual_requirement(request.daily_consumption, medicine.packaging)?;
        prescription.patient_id = request.patient_id;
        prescription.medicine_id = request.medicine_id;
        prescription.daily_dose = request.daily_dose;
        prescription.daily_consumption = request.daily_consumption;
        prescription.updated_at = crate::models::now_rfc3339();

        self.store.update_prescription(&prescription)?;
        Ok(prescription)
    }

    /// Delete a prescription. Dispensation history is kept.
    pub fn cancel_prescription(&mut self, id: &str) -> PharmacyResult<()> {
        if !self.store.delete_prescription(id)? {
            return Err(PharmacyError::NotFound(format!("prescription {id}")));
        }
        Ok(())
    }

    // =========================================================================
    // Dispensations
    // =========================================================================

    /// Record packages handed out to a patient.
    pub fn dispense(&mut self, fields: NewDispensation) -> PharmacyResult<Dispensation> {
        fields.validate()?;
        self.require_patient(&fields.patient_id)?;
        self.require_medicine(&fields.medicine_id)?;

        let dispensation = Dispensation::new(fields);
        self.store.insert_dispensation(&dispensation)?;
        tracing::info!(
            dispensation_id = %dispensation.id,
            quantity = dispensation.quantity,
            date = %dispensation.dispensation_date,
            "Recorded dispensation"
        );
        Ok(dispensation)
    }

    // =========================================================================
    // Reconciliation
    // =========================================================================

    /// Remaining need and status for a patient/medicine pair.
    pub fn reconcile_pair(
        &self,
        patient_id: &str,
        medicine_id: &str,
    ) -> PharmacyResult<Reconciliation> {
        let prescription = self
            .store
            .find_prescription_by_pair(patient_id, medicine_id)?
            .ok_or_else(|| {
                PharmacyError::NotFound(format!(
                    "prescription for patient {patient_id} and medicine {medicine_id}"
                ))
            })?;
        let history = self.store.dispensations_for_pair(patient_id, medicine_id)?;
        Ok(reconcile::reconcile(&prescription, &history))
    }

    /// Load every collection for reporting.
    pub fn snapshot(&self) -> PharmacyResult<Dataset> {
        Ok(Dataset::load(&*self.store)?)
    }

    fn require_patient(&self, id: &str) -> PharmacyResult<Patient> {
        self.store
            .get_patient(id)?
            .ok_or_else(|| PharmacyError::NotFound(format!("patient {id}")))
    }

    fn require_medicine(&self, id: &str) -> PharmacyResult<Medicine> {
        self.store
            .get_medicine(id)?
            .ok_or_else(|| PharmacyError::NotFound(format!("medicine {id}")))
    }
}

/// Rewrite the annual requirement of every prescription for `medicine`.
fn recompute_requirements<S: Store>(store: &mut S, medicine: &Medicine) -> PharmacyResult<usize> {
    let prescriptions = store.prescriptions_for_medicine(&medicine.id)?;
    let count = prescriptions.len();
    for mut prescription in prescriptions {
        prescription.annual_requirement = reconcile::compute_annual_requirement(
            prescription.daily_consumption,
            medicine.packaging,
        )?;
        prescription.updated_at = medicine.updated_at.clone();
        store.update_prescription(&prescription)?;
    }
    Ok(count)
}

// Edits validate packaging, so only rows written outside this service can hit this.
fn warn_unusable_packaging(medicine: &Medicine) {
    if medicine.packaging <= 0 {
        tracing::warn!(
            medicine_id = %medicine.id,
            packaging = medicine.packaging,
            "Stored medicine has non-positive packaging"
        );
    }
}
