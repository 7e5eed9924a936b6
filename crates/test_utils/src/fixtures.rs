//! Pre-built Test Fixtures
//!
//! Ready-to-use rate tables and applicants matching the standard rating
//! scenarios. Fixtures are consistent and predictable so unit tests can
//! assert exact premiums.

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use domain_rating::{
    CoverageInput, FactorApplyMode, FeeApplyMode, FeeType, InsuredObject, PaymentMode,
    ProductType, RateDataSnapshot, RateInput, RiderApplyMode,
};

use crate::builders::{RateInputBuilder, RateTableBuilder};

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Standard table effective date (Jan 1, 2025)
    pub fn table_effective() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    /// Standard rating date (Jun 1, 2025)
    pub fn rating_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }
}

/// Fixture for rate-table snapshots
pub struct RateTableFixtures;

impl RateTableFixtures {
    /// Disability table pricing the standard 35/M/NY/4A applicant at 2.50
    /// per benefit unit, with tobacco factor, a default rider, and a
    /// policy fee
    pub fn disability_standard() -> RateDataSnapshot {
        RateTableBuilder::new(ProductType::Disability)
            .entry("35|M|NY|4A|standard", dec!(2.50))
            .entry("35|M|*|4A|standard", dec!(2.75))
            .entry("35|M|*|4A|*", dec!(3.00))
            .factor("tobacco", "non_smoker", FactorApplyMode::Multiply, dec!(1.00), 10)
            .factor("tobacco", "smoker", FactorApplyMode::Multiply, dec!(1.50), 10)
            .factor("elimination_period", "90", FactorApplyMode::Multiply, dec!(1.00), 20)
            .factor("elimination_period", "30", FactorApplyMode::Multiply, dec!(1.35), 20)
            .rider("residual_disability", RiderApplyMode::Add, dec!(0.25), true, 10)
            .rider("cola", RiderApplyMode::Multiply, dec!(1.10), false, 20)
            .fee("policy_fee", FeeType::Fee, FeeApplyMode::Add, dec!(25), 10)
            .modal(PaymentMode::Monthly, dec!(0.0875), dec!(0))
            .build()
    }

    /// Life table pricing the standard 40/F/NT applicant at 1.20 per
    /// thousand of face
    pub fn life_standard() -> RateDataSnapshot {
        RateTableBuilder::new(ProductType::Life)
            .entry("40|F|NT|standard", dec!(1.20))
            .entry("40|F|NT|*", dec!(1.45))
            .entry("40|F|T|standard", dec!(2.10))
            .factor("bmi", "normal", FactorApplyMode::Multiply, dec!(1.00), 10)
            .factor("bmi", "obese", FactorApplyMode::Multiply, dec!(1.40), 10)
            .modal(PaymentMode::Monthly, dec!(0.0875), dec!(0))
            .build()
    }

    /// Auto table pricing Texas new vehicles at 480 per vehicle
    pub fn auto_standard() -> RateDataSnapshot {
        RateTableBuilder::new(ProductType::Auto)
            .entry("TX|new", dec!(480))
            .entry("TX|mid", dec!(390))
            .entry("TX|old", dec!(310))
            .entry("TX|*", dec!(420))
            .factor("multi_vehicle", "yes", FactorApplyMode::Multiply, dec!(0.90), 10)
            .factor("multi_vehicle", "no", FactorApplyMode::Multiply, dec!(1.00), 10)
            .build()
    }

    /// Long-term-care table for the 65/F/OH applicant
    pub fn long_term_care_standard() -> RateDataSnapshot {
        RateTableBuilder::new(ProductType::LongTermCare)
            .entry("65|F|OH", dec!(8.40))
            .entry("65|F|*", dec!(9.10))
            .build()
    }
}

/// Fixture for rating inputs
pub struct ApplicantFixtures;

impl ApplicantFixtures {
    /// The standard disability applicant: 35, male, NY, class 4A,
    /// standard underwriting, 72k income
    pub fn disability_standard() -> RateInput {
        RateInputBuilder::new(ProductType::Disability)
            .age(35)
            .sex("male")
            .state("NY")
            .occupation_class("4A")
            .uw_class("standard")
            .annual_income(dec!(72000))
            .build()
    }

    /// The standard life applicant: 40, female, non-tobacco, standard
    /// underwriting, 250k face
    pub fn life_standard() -> RateInput {
        RateInputBuilder::new(ProductType::Life)
            .age(40)
            .sex("F")
            .state("CA")
            .uw_class("standard")
            .tobacco_use(false)
            .coverage(CoverageInput {
                coverage_type: Some("death_benefit".to_string()),
                benefit_amount: Some(dec!(250000)),
                ..Default::default()
            })
            .build()
    }

    /// The standard auto applicant: one 2022 vehicle in Texas
    pub fn auto_standard() -> RateInput {
        RateInputBuilder::new(ProductType::Auto)
            .state("TX")
            .insured_object(InsuredObject {
                object_type: Some("vehicle".to_string()),
                vehicle_year: Some(2022),
                ..Default::default()
            })
            .build()
    }

    /// The standard long-term-care applicant: 65, female, OH
    pub fn long_term_care_standard() -> RateInput {
        RateInputBuilder::new(ProductType::LongTermCare)
            .age(65)
            .sex("female")
            .state("OH")
            .build()
    }
}
