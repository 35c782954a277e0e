//! Medicine catalogue models.

use serde::{Deserialize, Serialize};

use super::validation::{require_non_negative, require_text, ValidationError};

/// A medicine in the formulary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medicine {
    /// UUID generated on creation
    pub id: String,
    /// Standardized nomenclature node code
    pub smmn_node_code: String,
    /// Formulary section
    pub section: String,
    /// Standardized international non-proprietary name
    pub standardized_mnn: String,
    /// Trade name approved by the medical commission
    pub trade_name: String,
    /// Standardized dosage form (e.g. "film-coated tablets")
    pub dosage_form: String,
    /// Standardized dosage (e.g. "25 mg")
    pub dosage: String,
    /// Free-form characteristic
    pub characteristic: String,
    /// Dose units per package
    pub packaging: i64,
    /// Price per package
    pub price: f64,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

/// Medicine fields as submitted by a caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMedicine {
    pub smmn_node_code: String,
    pub section: String,
    pub standardized_mnn: String,
    pub trade_name: String,
    pub dosage_form: String,
    pub dosage: String,
    #[serde(default)]
    pub characteristic: String,
    pub packaging: i64,
    pub price: f64,
}

impl NewMedicine {
    /// Reject incomplete input, non-positive packaging and negative prices.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("node code", &self.smmn_node_code)?;
        require_text("section", &self.section)?;
        require_text("standardized MNN", &self.standardized_mnn)?;
        require_text("trade name", &self.trade_name)?;
        require_text("dosage form", &self.dosage_form)?;
        require_text("dosage", &self.dosage)?;
        if self.packaging <= 0 {
            return Err(ValidationError::NotPositive {
                field: "packaging",
                value: self.packaging as f64,
            });
        }
        require_non_negative("price", self.price)?;
        Ok(())
    }
}

impl Medicine {
    /// Create a new medicine from validated fields.
    pub fn new(fields: NewMedicine) -> Self {
        let now = super::now_rfc3339();
        Self {
            id: super::new_id(),
            smmn_node_code: fields.smmn_node_code,
            section: fields.section,
            standardized_mnn: fields.standardized_mnn,
            trade_name: fields.trade_name,
            dosage_form: fields.dosage_form,
            dosage: fields.dosage,
            characteristic: fields.characteristic,
            packaging: fields.packaging,
            price: fields.price,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Overwrite editable fields. Returns true if packaging changed.
    pub fn apply(&mut self, fields: NewMedicine) -> bool {
        let packaging_changed = self.packaging != fields.packaging;
        self.smmn_node_code = fields.smmn_node_code;
        self.section = fields.section;
        self.standardized_mnn = fields.standardized_mnn;
        self.trade_name = fields.trade_name;
        self.dosage_form = fields.dosage_form;
        self.dosage = fields.dosage;
        self.characteristic = fields.characteristic;
        self.packaging = fields.packaging;
        self.price = fields.price;
        self.updated_at = super::now_rfc3339();
        packaging_changed
    }

    /// Name shown in lists and reports: MNN followed by dosage.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.standardized_mnn, self.dosage)
    }
}
