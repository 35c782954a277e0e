//! Dispensation log report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{matches_filter, Dataset, ToJson};
use crate::models::NOT_AVAILABLE;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DispensationFilter {
    pub patient: String,
    pub doctor: String,
    pub medicine: String,
    /// Inclusive lower bound
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound
    pub to: Option<NaiveDate>,
}

impl DispensationFilter {
    fn in_range(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DispensationRow {
    pub dispensation_id: String,
    pub dispensation_date: NaiveDate,
    pub patient_name: String,
    pub attending_doctor: String,
    pub medicine_name: String,
    pub quantity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DispensationsReport {
    pub rows: Vec<DispensationRow>,
}

impl DispensationsReport {
    /// Rows sorted by date, newest first.
    pub fn build(data: &Dataset, filter: &DispensationFilter) -> Self {
        let mut entries: Vec<(&str, DispensationRow)> = data
            .dispensations
            .iter()
            .filter(|d| filter.in_range(d.dispensation_date))
            .map(|d| {
                let row = DispensationRow {
                    dispensation_id: d.id.clone(),
                    dispensation_date: d.dispensation_date,
                    patient_name: data.patient_name(&d.patient_id),
                    attending_doctor: data
                        .patient(&d.patient_id)
                        .map_or(NOT_AVAILABLE, |p| p.attending_doctor.as_str())
                        .to_string(),
                    medicine_name: data.medicine_name(&d.medicine_id),
                    quantity: d.quantity,
                };
                (d.created_at.as_str(), row)
            })
            .filter(|(_, row)| {
                matches_filter(&row.patient_name, &filter.patient)
                    && matches_filter(&row.attending_doctor, &filter.doctor)
                    && matches_filter(&row.medicine_name, &filter.medicine)
            })
            .collect();

        entries.sort_by(|(a_created, a), (b_created, b)| {
            b.dispensation_date
                .cmp(&a.dispensation_date)
                .then_with(|| b_created.cmp(a_created))
        });

        Self {
            rows: entries.into_iter().map(|(_, row)| row).collect(),
        }
    }

    pub fn total_quantity(&self) -> f64 {
        self.rows.iter().map(|r| r.quantity).sum()
    }
}

impl ToJson for DispensationsReport {}
