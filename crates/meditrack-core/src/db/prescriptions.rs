//! Prescription database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{classify, Database, DbResult, PrescriptionStore};
use crate::models::Prescription;

const PRESCRIPTION_COLUMNS: &str = "id, patient_id, medicine_id, daily_dose, daily_consumption, \
     annual_requirement, created_at, updated_at";

fn prescription_from_row(row: &Row<'_>) -> rusqlite::Result<Prescription> {
    Ok(Prescription {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        medicine_id: row.get(2)?,
        daily_dose: row.get(3)?,
        daily_consumption: row.get(4)?,
        annual_requirement: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

impl Database {
    fn query_prescriptions(&self, filter: &str, args: &[&str]) -> DbResult<Vec<Prescription>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions {filter} \
             ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt.query_map(rusqlite::params_from_iter(args), prescription_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

impl PrescriptionStore for Database {
    fn insert_prescription(&mut self, prescription: &Prescription) -> DbResult<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO prescriptions (
                    id, patient_id, medicine_id, daily_dose, daily_consumption,
                    annual_requirement, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    prescription.id,
                    prescription.patient_id,
                    prescription.medicine_id,
                    prescription.daily_dose,
                    prescription.daily_consumption,
                    prescription.annual_requirement,
                    prescription.created_at,
                    prescription.updated_at,
                ],
            )
            .map_err(classify)?;
        Ok(())
    }

    fn update_prescription(&mut self, prescription: &Prescription) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute(
                r#"
                UPDATE prescriptions SET
                    patient_id = ?2,
                    medicine_id = ?3,
                    daily_dose = ?4,
                    daily_consumption = ?5,
                    annual_requirement = ?6,
                    updated_at = ?7
                WHERE id = ?1
                "#,
                params![
                    prescription.id,
                    prescription.patient_id,
                    prescription.medicine_id,
                    prescription.daily_dose,
                    prescription.daily_consumption,
                    prescription.annual_requirement,
                    prescription.updated_at,
                ],
            )
            .map_err(classify)?;
        Ok(rows_affected > 0)
    }

    fn get_prescription(&self, id: &str) -> DbResult<Option<Prescription>> {
        self.conn
            .query_row(
                &format!("SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions WHERE id = ?"),
                [id],
                prescription_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    fn list_prescriptions(&self) -> DbResult<Vec<Prescription>> {
        self.query_prescriptions("", &[])
    }

    fn delete_prescription(&mut self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM prescriptions WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    fn find_prescription_by_pair(
        &self,
        patient_id: &str,
        medicine_id: &str,
    ) -> DbResult<Option<Prescription>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions \
                     WHERE patient_id = ?1 AND medicine_id = ?2"
                ),
                [patient_id, medicine_id],
                prescription_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    fn prescriptions_for_medicine(&self, medicine_id: &str) -> DbResult<Vec<Prescription>> {
        self.query_prescriptions("WHERE medicine_id = ?1", &[medicine_id])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DbError, MedicineStore, PatientStore};
    use crate::models::{Medicine, NewMedicine, NewPatient, Patient};

    struct Fixture {
        db: Database,
        patient: Patient,
        medicine: Medicine,
    }

    fn setup() -> Fixture {
        let mut db = Database::open_in_memory().unwrap();
        let patient = Patient::new(NewPatient {
            full_name: "Ivanov Ivan Ivanovich".into(),
            birth_year: 1980,
            diagnosis: "J45.9 Asthma".into(),
            attending_doctor: "Petrov P.P.".into(),
        });
        let medicine = Medicine::new(NewMedicine {
            smmn_node_code: "N02BE01".into(),
            section: "Analgesics".into(),
            standardized_mnn: "PARACETAMOL".into(),
            trade_name: "Paracetamol".into(),
            dosage_form: "TABLETS".into(),
            dosage: "500 mg".into(),
            characteristic: "-".into(),
            packaging: 10,
            price: 50.0,
        });
        db.insert_patient(&patient).unwrap();
        db.insert_medicine(&medicine).unwrap();
        Fixture { db, patient, medicine }
    }

    fn prescription(patient_id: &str, medicine_id: &str) -> Prescription {
        let now = chrono::Utc::now().to_rfc3339();
        Prescription {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id: patient_id.into(),
            medicine_id: medicine_id.into(),
            daily_dose: "1 tab twice a day".into(),
            daily_consumption: 2.0,
            annual_requirement: 73.0,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    #[test]
    fn test_insert_and_find_by_pair() {
        let mut f = setup();
        let rx = prescription(&f.patient.id, &f.medicine.id);
        f.db.insert_prescription(&rx).unwrap();

        let found = f
            .db
            .find_prescription_by_pair(&f.patient.id, &f.medicine.id)
            .unwrap()
            .unwrap();
        assert_eq!(found, rx);
        assert!(f
            .db
            .find_prescription_by_pair(&f.patient.id, "other")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_duplicate_pair_is_constraint_error() {
        let mut f = setup();
        f.db
            .insert_prescription(&prescription(&f.patient.id, &f.medicine.id))
            .unwrap();

        let result = f
            .db
            .insert_prescription(&prescription(&f.patient.id, &f.medicine.id));
        assert!(matches!(result, Err(DbError::Constraint(_))));
    }

    #[test]
    fn test_unknown_patient_is_constraint_error() {
        let mut f = setup();
        let result = f
            .db
            .insert_prescription(&prescription("missing", &f.medicine.id));
        assert!(matches!(result, Err(DbError::Constraint(_))));
    }

    #[test]
    fn test_update_requirement() {
        let mut f = setup();
        let mut rx = prescription(&f.patient.id, &f.medicine.id);
        f.db.insert_prescription(&rx).unwrap();

        rx.daily_consumption = 1.0;
        rx.annual_requirement = 36.5;
        assert!(f.db.update_prescription(&rx).unwrap());

        let stored = f.db.get_prescription(&rx.id).unwrap().unwrap();
        assert_eq!(stored.annual_requirement, 36.5);
    }

    #[test]
    fn test_prescriptions_for_medicine() {
        let mut f = setup();
        f.db
            .insert_prescription(&prescription(&f.patient.id, &f.medicine.id))
            .unwrap();

        assert_eq!(
            f.db.prescriptions_for_medicine(&f.medicine.id).unwrap().len(),
            1
        );
        assert!(f.db.prescriptions_for_medicine("other").unwrap().is_empty());
    }

    #[test]
    fn test_patient_delete_cascades() {
        let mut f = setup();
        f.db
            .insert_prescription(&prescription(&f.patient.id, &f.medicine.id))
            .unwrap();

        f.db.delete_patient(&f.patient.id).unwrap();
        assert!(f.db.list_prescriptions().unwrap().is_empty());
    }
}
