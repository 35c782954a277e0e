//! Property tests for requirement arithmetic.

use chrono::NaiveDate;
use meditrack_core::models::{Dispensation, NewDispensation};
use meditrack_core::reconcile::{
    classify_status, compute_annual_requirement, compute_remaining_need, reconcile,
    upsert_prescription, ReconcileError, RequirementStatus, UpsertOutcome, DAYS_PER_YEAR,
};
use proptest::prelude::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * b.abs().max(1.0)
}

fn dispensation(patient: &str, medicine: &str, quantity: f64) -> Dispensation {
    Dispensation::new(NewDispensation {
        patient_id: patient.to_string(),
        medicine_id: medicine.to_string(),
        dispensation_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        quantity,
    })
}

proptest! {
    /// annual = daily × 365 / packaging
    #[test]
    fn annual_requirement_formula(daily in 0.01..100.0f64, packaging in 1..1000i64) {
        let annual = compute_annual_requirement(daily, packaging).unwrap();
        let expected = daily * DAYS_PER_YEAR / packaging as f64;
        prop_assert!(close(annual, expected), "{} != {}", annual, expected);
    }

    #[test]
    fn non_positive_packaging_rejected(daily in 0.01..100.0f64, packaging in -1000..=0i64) {
        prop_assert_eq!(
            compute_annual_requirement(daily, packaging),
            Err(ReconcileError::InvalidPackaging { packaging })
        );
    }

    #[test]
    fn remaining_need_subtracts_every_quantity(
        annual in 0.0..500.0f64,
        quantities in proptest::collection::vec(0.01..50.0f64, 0..20)
    ) {
        let remaining = compute_remaining_need(annual, &quantities);
        let expected = annual - quantities.iter().sum::<f64>();
        prop_assert!(close(remaining, expected), "{} != {}", remaining, expected);
    }

    /// More dispensing never increases remaining need
    #[test]
    fn remaining_need_is_monotone(
        annual in 0.0..500.0f64,
        quantities in proptest::collection::vec(0.01..50.0f64, 1..20)
    ) {
        let mut previous = compute_remaining_need::<f64>(annual, &[]);
        for n in 1..=quantities.len() {
            let current = compute_remaining_need(annual, &quantities[..n]);
            prop_assert!(current < previous);
            previous = current;
        }
    }

    #[test]
    fn status_matches_sign(remaining in -1000.0..1000.0f64) {
        let expected = if remaining <= 0.0 {
            RequirementStatus::Satisfied
        } else {
            RequirementStatus::Outstanding
        };
        prop_assert_eq!(classify_status(remaining), expected);
    }

    #[test]
    fn upsert_is_idempotent(daily in 0.01..20.0f64, packaging in 1..200i64) {
        let (first, outcome) = upsert_prescription(None, "p", "m", daily, packaging).unwrap();
        prop_assert_eq!(outcome, UpsertOutcome::Created);

        let (second, outcome) =
            upsert_prescription(Some(&first), "p", "m", daily, packaging).unwrap();
        prop_assert_eq!(outcome, UpsertOutcome::Updated);
        prop_assert_eq!(&second.id, &first.id);
        prop_assert_eq!(second.annual_requirement, first.annual_requirement);
    }

    /// Dispensations for other pairs never affect a reconciliation
    #[test]
    fn reconcile_ignores_other_pairs(
        daily in 0.01..10.0f64,
        packaging in 1..100i64,
        own in proptest::collection::vec(0.01..20.0f64, 0..10),
        foreign in proptest::collection::vec(0.01..20.0f64, 0..10)
    ) {
        let (rx, _) = upsert_prescription(None, "p1", "m1", daily, packaging).unwrap();

        let mut history: Vec<Dispensation> =
            own.iter().map(|&q| dispensation("p1", "m1", q)).collect();
        history.extend(foreign.iter().map(|&q| dispensation("p1", "m2", q)));
        history.extend(foreign.iter().map(|&q| dispensation("p2", "m1", q)));

        let reconciled = reconcile(&rx, &history);
        let expected = compute_remaining_need(rx.annual_requirement, &own);
        prop_assert!(close(reconciled.remaining_need, expected));
        prop_assert_eq!(reconciled.status, classify_status(reconciled.remaining_need));
    }
}
