//! SQLite schema definition.

/// Complete database schema for MediTrack Rx.
pub const SCHEMA: &str = r#"
-- Enable foreign keys (required for cascade deletes)
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Patients (cascade root)
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,
    full_name TEXT NOT NULL,
    birth_year INTEGER NOT NULL CHECK (birth_year >= 1900),
    diagnosis TEXT NOT NULL,
    attending_doctor TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(full_name);

-- ============================================================================
-- Medicines (cascade root)
-- ============================================================================

CREATE TABLE IF NOT EXISTS medicines (
    id TEXT PRIMARY KEY,
    smmn_node_code TEXT NOT NULL,
    section TEXT NOT NULL,
    standardized_mnn TEXT NOT NULL,
    trade_name TEXT NOT NULL,
    dosage_form TEXT NOT NULL,
    dosage TEXT NOT NULL,
    characteristic TEXT NOT NULL DEFAULT '',
    packaging INTEGER NOT NULL,                   -- units per package
    price REAL NOT NULL CHECK (price >= 0),       -- per package
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_medicines_mnn ON medicines(standardized_mnn);

-- ============================================================================
-- Prescriptions (one per patient/medicine pair)
-- ============================================================================

CREATE TABLE IF NOT EXISTS prescriptions (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(id) ON DELETE CASCADE,
    medicine_id TEXT NOT NULL REFERENCES medicines(id) ON DELETE CASCADE,
    daily_dose TEXT NOT NULL,
    daily_consumption REAL NOT NULL,
    annual_requirement REAL NOT NULL,             -- packages per year
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE (patient_id, medicine_id)
);

CREATE INDEX IF NOT EXISTS idx_prescriptions_medicine ON prescriptions(medicine_id);

-- ============================================================================
-- Dispensations (append-only events)
-- ============================================================================

CREATE TABLE IF NOT EXISTS dispensations (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(id) ON DELETE CASCADE,
    medicine_id TEXT NOT NULL REFERENCES medicines(id) ON DELETE CASCADE,
    dispensation_date TEXT NOT NULL,              -- YYYY-MM-DD
    quantity REAL NOT NULL CHECK (quantity > 0),  -- packages
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_dispensations_pair ON dispensations(patient_id, medicine_id);
CREATE INDEX IF NOT EXISTS idx_dispensations_date ON dispensations(dispensation_date);
"#;
