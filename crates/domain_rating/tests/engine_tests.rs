//! Rating Engine Tests
//!
//! End-to-end tests of the rating engine across product families:
//! - The standard disability, life, auto, and LTC scenarios with exact
//!   expected premiums
//! - Determinism of outputs and input hashes
//! - Fallback exhaustion and missing-table ineligibility
//! - Audit-run recording for every terminal status
//! - Monotonicity and serde round-trip properties
//!
//! # Test Organization
//!
//! - `scenario_tests` - canonical worked examples per product family
//! - `ineligibility_tests` - missing tables, exhausted fallbacks, bad input
//! - `recorder_tests` - one run per invocation, status coverage
//! - `property_tests` - determinism, monotonicity, round-trips

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use core_kernel::CarrierId;
use domain_rating::{
    InMemoryRateStore, InMemoryRunRecorder, PaymentMode, ProductType, RateDataSnapshot,
    RateInput, RateOutput, RateStore, RatingEngine, RatingError, RunStatus, StoreError,
    ENGINE_VERSION,
};
use test_utils::{ApplicantFixtures, RateTableBuilder, RateTableFixtures, TemporalFixtures};

fn rating_date() -> NaiveDate {
    TemporalFixtures::rating_date()
}

fn engine_with(snapshots: Vec<RateDataSnapshot>) -> (RatingEngine, Arc<InMemoryRunRecorder>) {
    let mut store = InMemoryRateStore::new();
    for snapshot in snapshots {
        store.insert(snapshot);
    }
    let recorder = Arc::new(InMemoryRunRecorder::new());
    let engine = RatingEngine::new(Arc::new(store), recorder.clone());
    (engine, recorder)
}

fn rate(engine: &RatingEngine, input: &RateInput) -> RateOutput {
    engine
        .rate_as_of(input, rating_date())
        .expect("rating should not fail")
}

// ============================================================================
// SCENARIO TESTS
// ============================================================================

mod scenario_tests {
    use super::*;

    /// Disability: 35/M/NY/4A/standard with 72k income and no requested
    /// benefit rates at the income-derived maximum
    #[test]
    fn test_disability_standard_scenario() {
        let (engine, _) = engine_with(vec![RateTableFixtures::disability_standard()]);
        let mut input = ApplicantFixtures::disability_standard();
        // Fix the auto-selected groups so the factored premium is exact
        input.tobacco_use = Some(false);
        input.elimination_period_days = Some(90);

        let output = rate(&engine, &input);

        assert!(output.eligible);
        assert_eq!(output.exposure, dec!(39));
        assert_eq!(output.base_rate_key.as_deref(), Some("35|M|NY|4A|standard"));
        assert_eq!(output.base_rate_value, Some(dec!(2.50)));
        assert_eq!(output.base_premium, dec!(97.50));
        // x1.00 tobacco, x1.00 elimination period
        assert_eq!(output.premium_factored, dec!(97.50));
        assert_eq!(output.factors_applied.len(), 2);
        // Default residual rider: 0.25 x 39 = 9.75
        assert_eq!(output.premium_with_riders, dec!(107.25));
        assert_eq!(output.riders_applied.len(), 1);
        // Policy fee 25
        assert_eq!(output.premium_annual, dec!(132.25));
        assert_eq!(output.rate_table_version, Some(1));
        assert_eq!(output.engine_version, ENGINE_VERSION);
    }

    /// Life: 40/F non-tobacco standard with 250k face at 1.20 per
    /// thousand, paid monthly
    #[test]
    fn test_life_standard_scenario() {
        let (engine, _) = engine_with(vec![RateTableFixtures::life_standard()]);
        let mut input = ApplicantFixtures::life_standard();
        input.payment_mode = PaymentMode::Monthly;

        let output = rate(&engine, &input);

        assert!(output.eligible);
        assert_eq!(output.exposure, dec!(250));
        assert_eq!(output.base_rate_key.as_deref(), Some("40|F|NT|standard"));
        assert_eq!(output.base_premium, dec!(300.00));
        assert_eq!(output.premium_annual, dec!(300.00));
        assert_eq!(output.modal_factor, dec!(0.0875));
        assert_eq!(output.modal_fee, dec!(0));
        assert_eq!(output.premium_modal, dec!(26.25));
        assert_eq!(output.modal_mode, PaymentMode::Monthly);
    }

    /// Auto: one 2022 vehicle in Texas classifies as new, exposure is the
    /// vehicle count
    #[test]
    fn test_auto_standard_scenario() {
        let (engine, _) = engine_with(vec![RateTableFixtures::auto_standard()]);
        let input = ApplicantFixtures::auto_standard();

        let output = rate(&engine, &input);

        assert!(output.eligible);
        assert_eq!(output.exposure, dec!(1));
        assert_eq!(output.base_rate_key.as_deref(), Some("TX|new"));
        assert_eq!(output.base_premium, dec!(480.00));
        // multi_vehicle auto-selects "no" at x1.00
        assert_eq!(output.premium_annual, dec!(480.00));
    }

    /// LTC goes through the disability plugin's separate code path with a
    /// default daily benefit of 150
    #[test]
    fn test_long_term_care_scenario() {
        let (engine, _) = engine_with(vec![RateTableFixtures::long_term_care_standard()]);
        let input = ApplicantFixtures::long_term_care_standard();

        let output = rate(&engine, &input);

        assert!(output.eligible);
        assert_eq!(output.exposure, dec!(15));
        assert_eq!(output.base_rate_key.as_deref(), Some("65|F|OH"));
        // 8.40 x 15
        assert_eq!(output.premium_annual, dec!(126.00));
    }

    /// Requested version selects an older table over the latest
    #[test]
    fn test_requested_table_version_is_used() {
        let v1 = RateTableBuilder::new(ProductType::Life)
            .with_version(1)
            .entry("40|F|NT|standard", dec!(1.20))
            .build();
        let v2 = RateTableBuilder::new(ProductType::Life)
            .with_version(2)
            .effective_from(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
            .entry("40|F|NT|standard", dec!(1.35))
            .build();
        let (engine, _) = engine_with(vec![v1, v2]);

        let mut input = ApplicantFixtures::life_standard();
        let output = rate(&engine, &input);
        assert_eq!(output.rate_table_version, Some(2));
        assert_eq!(output.base_rate_value, Some(dec!(1.35)));

        input.rate_table_version = Some(1);
        let output = rate(&engine, &input);
        assert_eq!(output.rate_table_version, Some(1));
        assert_eq!(output.base_rate_value, Some(dec!(1.20)));
    }

    /// Carrier-owned tables are preferred for that carrier's requests
    #[test]
    fn test_carrier_specific_table_is_preferred() {
        let carrier = CarrierId::new();
        let agnostic = RateTableBuilder::new(ProductType::Life)
            .entry("40|F|NT|standard", dec!(1.20))
            .build();
        let owned = RateTableBuilder::new(ProductType::Life)
            .with_carrier(carrier)
            .entry("40|F|NT|standard", dec!(1.05))
            .build();
        let (engine, _) = engine_with(vec![agnostic, owned]);

        let mut input = ApplicantFixtures::life_standard();
        input.carrier_id = Some(carrier);
        let output = rate(&engine, &input);
        assert_eq!(output.base_rate_value, Some(dec!(1.05)));

        input.carrier_id = None;
        let output = rate(&engine, &input);
        assert_eq!(output.base_rate_value, Some(dec!(1.20)));
    }
}

// ============================================================================
// INELIGIBILITY TESTS
// ============================================================================

mod ineligibility_tests {
    use super::*;

    /// No active table: ineligible with the product type named and no
    /// base rate key
    #[test]
    fn test_missing_active_table() {
        let (engine, _) = engine_with(vec![]);
        let input = ApplicantFixtures::life_standard();

        let output = rate(&engine, &input);

        assert!(!output.eligible);
        let reason = output.ineligible_reason.as_deref().unwrap();
        assert!(reason.contains("no active rate table"));
        assert!(reason.contains("life"));
        assert!(output.base_rate_key.is_none());
        assert!(output.rate_table_version.is_none());
    }

    /// Exhausted fallback chain reports the fully wildcarded key
    #[test]
    fn test_fallback_exhaustion_reports_attempted_key() {
        let (engine, _) = engine_with(vec![RateTableFixtures::disability_standard()]);
        let mut input = ApplicantFixtures::disability_standard();
        input.age = Some(36); // no 36-year-old rows exist

        let output = rate(&engine, &input);

        assert!(!output.eligible);
        let reason = output.ineligible_reason.as_deref().unwrap();
        assert!(reason.contains("36|M|*|4A|*"), "unexpected reason: {reason}");
        assert!(output.base_rate_key.is_none());
        // A table was resolved before the lookup failed
        assert_eq!(output.rate_table_version, Some(1));
    }

    #[test]
    fn test_eligibility_failure_short_circuits() {
        let (engine, _) = engine_with(vec![RateTableFixtures::disability_standard()]);
        let mut input = ApplicantFixtures::disability_standard();
        input.age = Some(17);

        let output = rate(&engine, &input);

        assert!(!output.eligible);
        assert!(output
            .ineligible_reason
            .as_deref()
            .unwrap()
            .contains("outside the issue range"));
        assert!(output.base_rate_key.is_none());
    }

    #[test]
    fn test_exhausted_benefit_capacity_is_ineligible() {
        let (engine, _) = engine_with(vec![RateTableFixtures::disability_standard()]);
        let mut input = ApplicantFixtures::disability_standard();
        input.existing_coverage_monthly = Some(dec!(4000));

        let output = rate(&engine, &input);

        assert!(!output.eligible);
        assert!(output
            .ineligible_reason
            .as_deref()
            .unwrap()
            .contains("no insurable monthly benefit"));
    }
}

// ============================================================================
// RECORDER TESTS
// ============================================================================

mod recorder_tests {
    use super::*;

    struct FailingStore;

    impl RateStore for FailingStore {
        fn active_snapshot(
            &self,
            _product_type: ProductType,
            _version: Option<u32>,
            _carrier: Option<CarrierId>,
            _as_of: NaiveDate,
        ) -> Result<Option<RateDataSnapshot>, StoreError> {
            Err(StoreError::unavailable("connection refused"))
        }
    }

    #[test]
    fn test_completed_run_is_recorded() {
        let (engine, recorder) = engine_with(vec![RateTableFixtures::life_standard()]);
        let input = ApplicantFixtures::life_standard();

        let output = rate(&engine, &input);

        let runs = recorder.runs();
        assert_eq!(runs.len(), 1);
        let run = &runs[0];
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.product_type, ProductType::Life);
        assert_eq!(run.rate_table_version, Some(1));
        assert_eq!(run.engine_version, ENGINE_VERSION);
        assert_eq!(run.premium_annual, Some(output.premium_annual));
        assert_eq!(run.input_hash.len(), 64);
        assert!(run.output_snapshot.is_some());
        assert!(run.error_message.is_none());
    }

    #[test]
    fn test_ineligible_run_is_recorded_verbatim() {
        let (engine, recorder) = engine_with(vec![]);
        let input = ApplicantFixtures::life_standard();

        let output = rate(&engine, &input);

        let runs = recorder.runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].status, RunStatus::Ineligible);
        assert!(runs[0].premium_annual.is_none());

        let snapshot = runs[0].output_snapshot.as_ref().unwrap();
        assert_eq!(
            snapshot.get("ineligible_reason").and_then(|v| v.as_str()),
            output.ineligible_reason.as_deref()
        );
    }

    #[test]
    fn test_store_failure_records_error_run_and_propagates() {
        let recorder = Arc::new(InMemoryRunRecorder::new());
        let engine = RatingEngine::new(Arc::new(FailingStore), recorder.clone());
        let input = ApplicantFixtures::life_standard();

        let result = engine.rate_as_of(&input, rating_date());
        assert!(matches!(result, Err(RatingError::Store(_))));

        let runs = recorder.runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].status, RunStatus::Error);
        assert!(runs[0]
            .error_message
            .as_deref()
            .unwrap()
            .contains("connection refused"));
        assert!(runs[0].output_snapshot.is_none());
    }

    #[test]
    fn test_every_invocation_appends_one_run() {
        let (engine, recorder) = engine_with(vec![RateTableFixtures::life_standard()]);
        let input = ApplicantFixtures::life_standard();

        for _ in 0..3 {
            rate(&engine, &input);
        }
        assert_eq!(recorder.len(), 3);
    }
}

// ============================================================================
// PROPERTY TESTS
// ============================================================================

mod property_tests {
    use super::*;

    /// Two calls over the same input and snapshot produce identical
    /// outputs and identical input hashes
    #[test]
    fn test_determinism() {
        let (engine, recorder) = engine_with(vec![RateTableFixtures::disability_standard()]);
        let mut input = ApplicantFixtures::disability_standard();
        input.tobacco_use = Some(false);

        let first = rate(&engine, &input);
        let second = rate(&engine, &input);

        assert_eq!(first, second);

        let runs = recorder.runs();
        assert_eq!(runs[0].input_hash, runs[1].input_hash);
        assert_eq!(runs[0].output_snapshot, runs[1].output_snapshot);
    }

    /// Below the cap, the base premium scales linearly with the requested
    /// benefit
    #[test]
    fn test_base_premium_linear_in_requested_benefit() {
        let (engine, _) = engine_with(vec![RateTableFixtures::disability_standard()]);

        let at = |benefit: Decimal| {
            let mut input = ApplicantFixtures::disability_standard();
            input.monthly_benefit_requested = Some(benefit);
            rate(&engine, &input)
        };

        let low = at(dec!(1000));
        let high = at(dec!(3000));
        assert_eq!(low.exposure, dec!(10));
        assert_eq!(high.exposure, dec!(30));
        assert_eq!(low.base_premium * dec!(3), high.base_premium);
    }

    /// A larger multiply-mode factor value produces a larger factored
    /// premium
    #[test]
    fn test_multiply_factor_monotonicity() {
        let (engine, _) = engine_with(vec![RateTableFixtures::disability_standard()]);

        let mut non_smoker = ApplicantFixtures::disability_standard();
        non_smoker.tobacco_use = Some(false);
        let mut smoker = ApplicantFixtures::disability_standard();
        smoker.tobacco_use = Some(true);

        let baseline = rate(&engine, &non_smoker);
        let loaded = rate(&engine, &smoker);
        assert!(loaded.premium_factored > baseline.premium_factored);
        // x1.50 tobacco load
        assert_eq!(loaded.premium_factored, dec!(146.25));
    }

    #[test]
    fn test_input_round_trip_is_lossless() {
        let mut input = ApplicantFixtures::disability_standard();
        input.metadata.insert(
            "source".to_string(),
            serde_json::json!({"channel": "agent", "id": 7}),
        );
        input.payment_mode = PaymentMode::Quarterly;

        let json = serde_json::to_string(&input).unwrap();
        let back: RateInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input, back);
    }

    #[test]
    fn test_output_round_trip_is_lossless() {
        let (engine, _) = engine_with(vec![RateTableFixtures::disability_standard()]);
        let input = ApplicantFixtures::disability_standard();
        let output = rate(&engine, &input);

        let json = serde_json::to_string(&output).unwrap();
        let back: RateOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(output, back);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;
        use test_utils::disability_input_strategy;

        proptest! {
            /// Rating any eligible disability input twice is deterministic
            #[test]
            fn rating_is_deterministic(input in disability_input_strategy()) {
                let (engine, _) =
                    engine_with(vec![RateTableFixtures::disability_standard()]);
                let first = engine.rate_as_of(&input, rating_date()).unwrap();
                let second = engine.rate_as_of(&input, rating_date()).unwrap();
                prop_assert_eq!(first, second);
            }

            /// Eligible outputs never carry a negative premium
            #[test]
            fn premiums_are_never_negative(input in disability_input_strategy()) {
                let (engine, _) =
                    engine_with(vec![RateTableFixtures::disability_standard()]);
                let output = engine.rate_as_of(&input, rating_date()).unwrap();
                if output.eligible {
                    prop_assert!(output.premium_annual >= Decimal::ZERO);
                    prop_assert!(output.premium_modal >= Decimal::ZERO);
                }
            }
        }
    }
}
