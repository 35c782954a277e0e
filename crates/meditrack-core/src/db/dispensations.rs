//! Dispensation database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{classify, Database, DbResult, DispensationStore};
use crate::models::Dispensation;

const DISPENSATION_COLUMNS: &str =
    "id, patient_id, medicine_id, dispensation_date, quantity, created_at";

fn dispensation_from_row(row: &Row<'_>) -> rusqlite::Result<Dispensation> {
    Ok(Dispensation {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        medicine_id: row.get(2)?,
        dispensation_date: row.get(3)?,
        quantity: row.get(4)?,
        created_at: row.get(5)?,
    })
}

impl DispensationStore for Database {
    fn insert_dispensation(&mut self, dispensation: &Dispensation) -> DbResult<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO dispensations (
                    id, patient_id, medicine_id, dispensation_date, quantity, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    dispensation.id,
                    dispensation.patient_id,
                    dispensation.medicine_id,
                    dispensation.dispensation_date,
                    dispensation.quantity,
                    dispensation.created_at,
                ],
            )
            .map_err(classify)?;
        Ok(())
    }

    fn get_dispensation(&self, id: &str) -> DbResult<Option<Dispensation>> {
        self.conn
            .query_row(
                &format!("SELECT {DISPENSATION_COLUMNS} FROM dispensations WHERE id = ?"),
                [id],
                dispensation_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    fn list_dispensations(&self) -> DbResult<Vec<Dispensation>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {DISPENSATION_COLUMNS} FROM dispensations \
             ORDER BY dispensation_date DESC, created_at DESC"
        ))?;
        let rows = stmt.query_map([], dispensation_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn dispensations_for_pair(
        &self,
        patient_id: &str,
        medicine_id: &str,
    ) -> DbResult<Vec<Dispensation>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {DISPENSATION_COLUMNS} FROM dispensations \
             WHERE patient_id = ?1 AND medicine_id = ?2 \
             ORDER BY dispensation_date DESC, created_at DESC"
        ))?;
        let rows = stmt.query_map([patient_id, medicine_id], dispensation_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
