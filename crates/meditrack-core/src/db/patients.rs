//! Patient database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{classify, Database, DbResult, PatientStore};
use crate::models::Patient;

const PATIENT_COLUMNS: &str =
    "id, full_name, birth_year, diagnosis, attending_doctor, created_at, updated_at";

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        full_name: row.get(1)?,
        birth_year: row.get(2)?,
        diagnosis: row.get(3)?,
        attending_doctor: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

impl PatientStore for Database {
    fn insert_patient(&mut self, patient: &Patient) -> DbResult<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO patients (
                    id, full_name, birth_year, diagnosis, attending_doctor,
                    created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    patient.id,
                    patient.full_name,
                    patient.birth_year,
                    patient.diagnosis,
                    patient.attending_doctor,
                    patient.created_at,
                    patient.updated_at,
                ],
            )
            .map_err(classify)?;
        Ok(())
    }

    fn update_patient(&mut self, patient: &Patient) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute(
                r#"
                UPDATE patients SET
                    full_name = ?2,
                    birth_year = ?3,
                    diagnosis = ?4,
                    attending_doctor = ?5,
                    updated_at = ?6
                WHERE id = ?1
                "#,
                params![
                    patient.id,
                    patient.full_name,
                    patient.birth_year,
                    patient.diagnosis,
                    patient.attending_doctor,
                    patient.updated_at,
                ],
            )
            .map_err(classify)?;
        Ok(rows_affected > 0)
    }

    fn get_patient(&self, id: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?"),
                [id],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients ORDER BY full_name, birth_year"
        ))?;
        let rows = stmt.query_map([], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn delete_patient(&mut self, id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM patients WHERE id = ?", [id])?;
        if rows_affected > 0 {
            tracing::debug!(patient_id = id, "Deleted patient with dependent records");
        }
        Ok(rows_affected > 0)
    }
}
