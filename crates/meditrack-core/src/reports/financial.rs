//! Cost of annual requirements, dispensed stock and outstanding need.

use serde::{Deserialize, Serialize};

use super::{matches_filter, paginate, Dataset, Page, ToJson};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinancialRow {
    pub medicine_id: String,
    pub medicine_name: String,
    pub price: f64,
    pub annual_requirement: f64,
    pub total_dispensed: f64,
    pub requirement_cost: f64,
    pub dispensed_cost: f64,
    /// Zero once dispensing has caught up with the requirement
    pub remaining_cost: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FinancialTotals {
    pub requirement_cost: f64,
    pub dispensed_cost: f64,
    pub remaining_cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinancialReport {
    pub page: Page<FinancialRow>,
    /// Over every filtered row, not only the current page
    pub totals: FinancialTotals,
}

impl FinancialReport {
    pub fn build(data: &Dataset, medicine_filter: &str, page: usize, per_page: usize) -> Self {
        let rows: Vec<FinancialRow> = data
            .medicines
            .iter()
            .map(|medicine| {
                let annual_requirement: f64 = data
                    .prescriptions
                    .iter()
                    .filter(|rx| rx.medicine_id == medicine.id)
                    .map(|rx| rx.annual_requirement)
                    .sum();
                let total_dispensed: f64 = data
                    .dispensations
                    .iter()
                    .filter(|d| d.medicine_id == medicine.id)
                    .map(|d| d.quantity)
                    .sum();
                let remaining_need = (annual_requirement - total_dispensed).max(0.0);

                FinancialRow {
                    medicine_id: medicine.id.clone(),
                    medicine_name: medicine.display_name(),
                    price: medicine.price,
                    annual_requirement,
                    total_dispensed,
                    requirement_cost: annual_requirement * medicine.price,
                    dispensed_cost: total_dispensed * medicine.price,
                    remaining_cost: remaining_need * medicine.price,
                }
            })
            .filter(|row| row.requirement_cost > 0.0)
            .filter(|row| matches_filter(&row.medicine_name, medicine_filter))
            .collect();

        let totals = rows.iter().fold(FinancialTotals::default(), |mut acc, row| {
            acc.requirement_cost += row.requirement_cost;
            acc.dispensed_cost += row.dispensed_cost;
            acc.remaining_cost += row.remaining_cost;
            acc
        });

        Self {
            page: paginate(rows, page, per_page),
            totals,
        }
    }
}

impl ToJson for FinancialReport {}
