//! Medicine database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{classify, Database, DbResult, MedicineStore};
use crate::models::Medicine;

const MEDICINE_COLUMNS: &str = "id, smmn_node_code, section, standardized_mnn, trade_name, \
     dosage_form, dosage, characteristic, packaging, price, created_at, updated_at";

fn medicine_from_row(row: &Row<'_>) -> rusqlite::Result<Medicine> {
    Ok(Medicine {
        id: row.get(0)?,
        smmn_node_code: row.get(1)?,
        section: row.get(2)?,
        standardized_mnn: row.get(3)?,
        trade_name: row.get(4)?,
        dosage_form: row.get(5)?,
        dosage: row.get(6)?,
        characteristic: row.get(7)?,
        packaging: row.get(8)?,
        price: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

impl MedicineStore for Database {
    fn insert_medicine(&mut self, medicine: &Medicine) -> DbResult<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO medicines (
                    id, smmn_node_code, section, standardized_mnn, trade_name,
                    dosage_form, dosage, characteristic, packaging, price,
                    created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                "#,
                params![
                    medicine.id,
                    medicine.smmn_node_code,
                    medicine.section,
                    medicine.standardized_mnn,
                    medicine.trade_name,
                    medicine.dosage_form,
                    medicine.dosage,
                    medicine.characteristic,
                    medicine.packaging,
                    medicine.price,
                    medicine.created_at,
                    medicine.updated_at,
                ],
            )
            .map_err(classify)?;
        Ok(())
    }

    fn update_medicine(&mut self, medicine: &Medicine) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute(
                r#"
                UPDATE medicines SET
                    smmn_node_code = ?2,
                    section = ?3,
                    standardized_mnn = ?4,
                    trade_name = ?5,
                    dosage_form = ?6,
                    dosage = ?7,
                    characteristic = ?8,
                    packaging = ?9,
                    price = ?10,
                    updated_at = ?11
                WHERE id = ?1
                "#,
                params![
                    medicine.id,
                    medicine.smmn_node_code,
                    medicine.section,
                    medicine.standardized_mnn,
                    medicine.trade_name,
                    medicine.dosage_form,
                    medicine.dosage,
                    medicine.characteristic,
                    medicine.packaging,
                    medicine.price,
                    medicine.updated_at,
                ],
            )
            .map_err(classify)?;
        Ok(rows_affected > 0)
    }

    fn get_medicine(&self, id: &str) -> DbResult<Option<Medicine>> {
        self.conn
            .query_row(
                &format!("SELECT {MEDICINE_COLUMNS} FROM medicines WHERE id = ?"),
                [id],
                medicine_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    fn list_medicines(&self) -> DbResult<Vec<Medicine>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {MEDICINE_COLUMNS} FROM medicines ORDER BY standardized_mnn, dosage"
        ))?;
        let rows = stmt.query_map([], medicine_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn delete_medicine(&mut self, id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM medicines WHERE id = ?", [id])?;
        if rows_affected > 0 {
            tracing::debug!(medicine_id = id, "Deleted medicine with dependent records");
        }
        Ok(rows_affected > 0)
    }
}
