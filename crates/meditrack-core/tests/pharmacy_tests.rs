//! End-to-end pharmacy workflows against both store implementations.

use chrono::NaiveDate;
use meditrack_core::db::{Database, MemoryStore, Store};
use meditrack_core::models::{
    Medicine, NewDispensation, NewMedicine, NewPatient, Patient, PrescriptionRequest,
};
use meditrack_core::pharmacy::{Pharmacy, PharmacyError};
use meditrack_core::reconcile::{RequirementStatus, UpsertOutcome};
use meditrack_core::reports::{
    Dashboard, FinancialReport, PrescriptionFilter, PrescriptionsReport, StatusFilter,
};

const EPSILON: f64 = 1e-9;

fn new_patient(name: &str) -> NewPatient {
    NewPatient {
        full_name: name.to_string(),
        birth_year: 1958,
        diagnosis: "E11.7 Type 2 diabetes".to_string(),
        attending_doctor: "Achabaeva A.V.".to_string(),
    }
}

fn new_medicine(mnn: &str, packaging: i64, price: f64) -> NewMedicine {
    NewMedicine {
        smmn_node_code: "21.20.10.236-000024-1-00114".to_string(),
        section: "1 (a)".to_string(),
        standardized_mnn: mnn.to_string(),
        trade_name: "-".to_string(),
        dosage_form: "FILM-COATED TABLETS".to_string(),
        dosage: "25 mg".to_string(),
        characteristic: "-".to_string(),
        packaging,
        price,
    }
}

fn request(patient: &Patient, medicine: &Medicine, daily: f64) -> PrescriptionRequest {
    PrescriptionRequest {
        patient_id: patient.id.clone(),
        medicine_id: medicine.id.clone(),
        daily_dose: format!("{} tab daily", daily),
        daily_consumption: daily,
    }
}

fn hand_out(patient: &Patient, medicine: &Medicine, day: u32, quantity: f64) -> NewDispensation {
    NewDispensation {
        patient_id: patient.id.clone(),
        medicine_id: medicine.id.clone(),
        dispensation_date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        quantity,
    }
}

/// 2 tablets a day from packs of 60, then 5 and 8 packs handed out.
fn dispensing_scenario<S: Store>(store: &mut S) {
    let mut pharmacy = Pharmacy::new(store);
    let patient = pharmacy.register_patient(new_patient("Abaeva Tatiana")).unwrap();
    let medicine = pharmacy
        .add_medicine(new_medicine("AGOMELATINE", 60, 1307.0))
        .unwrap();

    let (rx, outcome) = pharmacy.prescribe(request(&patient, &medicine, 2.0)).unwrap();
    assert_eq!(outcome, UpsertOutcome::Created);
    assert!((rx.annual_requirement - 12.166_666_666_666_666).abs() < EPSILON);

    let fresh = pharmacy.reconcile_pair(&patient.id, &medicine.id).unwrap();
    assert_eq!(fresh.remaining_need, rx.annual_requirement);
    assert_eq!(fresh.status, RequirementStatus::Outstanding);

    pharmacy.dispense(hand_out(&patient, &medicine, 10, 5.0)).unwrap();
    let partial = pharmacy.reconcile_pair(&patient.id, &medicine.id).unwrap();
    assert!((partial.remaining_need - 7.166_666_666_666_666).abs() < EPSILON);
    assert_eq!(partial.status, RequirementStatus::Outstanding);

    pharmacy.dispense(hand_out(&patient, &medicine, 20, 8.0)).unwrap();
    let done = pharmacy.reconcile_pair(&patient.id, &medicine.id).unwrap();
    assert!((done.remaining_need + 0.833_333_333_333_333).abs() < EPSILON);
    assert_eq!(done.status, RequirementStatus::Satisfied);
    assert_eq!(done.total_dispensed, 13.0);
}

#[test]
fn test_dispensing_scenario_sqlite() {
    let mut db = Database::open_in_memory().unwrap();
    dispensing_scenario(&mut db);
}

#[test]
fn test_dispensing_scenario_memory() {
    let mut store = MemoryStore::new();
    dispensing_scenario(&mut store);
}

#[test]
fn test_exact_requirement_is_satisfied() {
    let mut store = MemoryStore::new();
    let mut pharmacy = Pharmacy::new(&mut store);
    let patient = pharmacy.register_patient(new_patient("Sidorova Elena")).unwrap();
    let medicine = pharmacy.add_medicine(new_medicine("ENALAPRIL", 20, 120.0)).unwrap();

    let (rx, _) = pharmacy.prescribe(request(&patient, &medicine, 1.0)).unwrap();
    assert_eq!(rx.annual_requirement, 18.25);

    pharmacy.dispense(hand_out(&patient, &medicine, 3, 18.25)).unwrap();
    let reconciled = pharmacy.reconcile_pair(&patient.id, &medicine.id).unwrap();
    assert_eq!(reconciled.remaining_need, 0.0);
    assert_eq!(reconciled.status, RequirementStatus::Satisfied);
}

#[test]
fn test_persisted_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("meditrack.db");

    let (patient_id, medicine_id) = {
        let mut db = Database::open(&path).unwrap();
        let mut pharmacy = Pharmacy::new(&mut db);
        let patient = pharmacy.register_patient(new_patient("Ivanov Ivan")).unwrap();
        let medicine = pharmacy.add_medicine(new_medicine("METFORMIN", 60, 200.0)).unwrap();
        pharmacy.prescribe(request(&patient, &medicine, 2.0)).unwrap();
        pharmacy.dispense(hand_out(&patient, &medicine, 5, 4.0)).unwrap();
        (patient.id, medicine.id)
    };

    let mut db = Database::open(&path).unwrap();
    let pharmacy = Pharmacy::new(&mut db);
    let reconciled = pharmacy.reconcile_pair(&patient_id, &medicine_id).unwrap();
    assert!((reconciled.annual_requirement - 730.0 / 60.0).abs() < EPSILON);
    assert_eq!(reconciled.total_dispensed, 4.0);
}

#[test]
fn test_cancel_prescription_keeps_history() {
    let mut db = Database::open_in_memory().unwrap();
    let mut pharmacy = Pharmacy::new(&mut db);
    let patient = pharmacy.register_patient(new_patient("Ivanov Ivan")).unwrap();
    let medicine = pharmacy.add_medicine(new_medicine("METFORMIN", 60, 200.0)).unwrap();
    let (rx, _) = pharmacy.prescribe(request(&patient, &medicine, 2.0)).unwrap();
    pharmacy.dispense(hand_out(&patient, &medicine, 5, 4.0)).unwrap();

    pharmacy.cancel_prescription(&rx.id).unwrap();
    assert!(matches!(
        pharmacy.reconcile_pair(&patient.id, &medicine.id),
        Err(PharmacyError::NotFound(_))
    ));
    assert_eq!(pharmacy.snapshot().unwrap().dispensations.len(), 1);

    // Re-prescribing picks the history back up
    pharmacy.prescribe(request(&patient, &medicine, 2.0)).unwrap();
    let reconciled = pharmacy.reconcile_pair(&patient.id, &medicine.id).unwrap();
    assert_eq!(reconciled.total_dispensed, 4.0);
}

#[test]
fn test_reports_from_snapshot() {
    let mut db = Database::open_in_memory().unwrap();
    let mut pharmacy = Pharmacy::new(&mut db);
    let abaeva = pharmacy.register_patient(new_patient("Abaeva Tatiana")).unwrap();
    let sidorova = pharmacy.register_patient(new_patient("Sidorova Elena")).unwrap();
    let agomelatine = pharmacy
        .add_medicine(new_medicine("AGOMELATINE", 28, 1000.0))
        .unwrap();
    let enalapril = pharmacy.add_medicine(new_medicine("ENALAPRIL", 20, 100.0)).unwrap();

    pharmacy.prescribe(request(&abaeva, &agomelatine, 2.0)).unwrap();
    pharmacy.prescribe(request(&sidorova, &enalapril, 1.0)).unwrap();
    pharmacy.dispense(hand_out(&sidorova, &enalapril, 15, 20.0)).unwrap();

    let data = pharmacy.snapshot().unwrap();

    let unmet = PrescriptionsReport::build(
        &data,
        &PrescriptionFilter {
            status: StatusFilter::Unmet,
            ..Default::default()
        },
    );
    assert_eq!(unmet.rows.len(), 1);
    assert_eq!(unmet.rows[0].patient_name, "Abaeva Tatiana");

    let financial = FinancialReport::build(&data, "", 1, 15);
    let enalapril_row = financial
        .page
        .items
        .iter()
        .find(|row| row.medicine_id == enalapril.id)
        .unwrap();
    assert_eq!(enalapril_row.remaining_cost, 0.0);
    assert!((enalapril_row.dispensed_cost - 2000.0).abs() < EPSILON);

    let today = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    let dashboard = Dashboard::build(&data, today, 5);
    assert_eq!(dashboard.total_patients, 2);
    assert_eq!(dashboard.dispensations_this_month, 1);
}
