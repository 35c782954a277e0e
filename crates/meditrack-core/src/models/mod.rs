//! Domain models for the MediTrack Rx system.

mod dispensation;
mod medicine;
mod patient;
mod prescription;
mod validation;

pub use dispensation::*;
pub use medicine::*;
pub use patient::*;
pub use prescription::*;
pub use validation::*;

/// Placeholder shown when a referenced record cannot be found.
pub const NOT_AVAILABLE: &str = "n/a";

/// Current timestamp in the format stored on every record.
pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Fresh record identifier.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
