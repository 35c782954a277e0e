//! Patient models.

use serde::{Deserialize, Serialize};

use super::validation::{require_text, ValidationError, MIN_BIRTH_YEAR};

/// A patient record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// UUID generated on registration
    pub id: String,
    /// Full name (surname, given name, patronymic)
    pub full_name: String,
    /// Year of birth
    pub birth_year: i32,
    /// Diagnosis, usually prefixed with an ICD-10 code
    pub diagnosis: String,
    /// Attending doctor
    pub attending_doctor: String,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

/// Patient fields as submitted by a caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPatient {
    pub full_name: String,
    pub birth_year: i32,
    pub diagnosis: String,
    pub attending_doctor: String,
}

impl NewPatient {
    /// Reject incomplete or implausible input.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("full name", &self.full_name)?;
        if self.birth_year < MIN_BIRTH_YEAR {
            return Err(ValidationError::BirthYear(self.birth_year));
        }
        require_text("diagnosis", &self.diagnosis)?;
        require_text("attending doctor", &self.attending_doctor)?;
        Ok(())
    }
}

impl Patient {
    /// Create a new patient from validated fields.
    pub fn new(fields: NewPatient) -> Self {
        let now = super::now_rfc3339();
        Self {
            id: super::new_id(),
            full_name: fields.full_name,
            birth_year: fields.birth_year,
            diagnosis: fields.diagnosis,
            attending_doctor: fields.attending_doctor,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Overwrite editable fields, keeping identity and creation time.
    pub fn apply(&mut self, fields: NewPatient) {
        self.full_name = fields.full_name;
        self.birth_year = fields.birth_year;
        self.diagnosis = fields.diagnosis;
        self.attending_doctor = fields.attending_doctor;
        self.updated_at = super::now_rfc3339();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> NewPatient {
        NewPatient {
            full_name: "Ivanov Ivan Ivanovich".into(),
            birth_year: 1980,
            diagnosis: "J45.9 Asthma, unspecified".into(),
            attending_doctor: "Petrov P.P.".into(),
        }
    }

    #[test]
    fn test_new_patient() {
        let patient = Patient::new(fields());
        assert_eq!(patient.full_name, "Ivanov Ivan Ivanovich");
        assert_eq!(patient.birth_year, 1980);
        assert_eq!(patient.id.len(), 36); // UUID format
    }

    #[test]
    fn test_validate_birth_year() {
        let mut input = fields();
        input.birth_year = 1899;
        assert_eq!(input.validate(), Err(ValidationError::BirthYear(1899)));
    }

    #[test]
    fn test_validate_required_fields() {
        let mut input = fields();
        input.attending_doctor = String::new();
        assert_eq!(
            input.validate(),
            Err(ValidationError::Required("attending doctor"))
        );
        assert!(fields().validate().is_ok());
    }
}
