//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating rating data that maintains
//! domain invariants.

use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_rating::{PaymentMode, ProductType, RateInput};

use crate::builders::RateInputBuilder;

/// Strategy for generating any product type
pub fn product_type_strategy() -> impl Strategy<Value = ProductType> {
    prop_oneof![
        Just(ProductType::Disability),
        Just(ProductType::LongTermCare),
        Just(ProductType::Life),
        Just(ProductType::Auto),
        Just(ProductType::Motorcycle),
        Just(ProductType::Boat),
        Just(ProductType::Rv),
        Just(ProductType::Homeowners),
        Just(ProductType::Renters),
        Just(ProductType::Condo),
        Just(ProductType::GeneralLiability),
        Just(ProductType::Umbrella),
        Just(ProductType::WorkersComp),
    ]
}

/// Strategy for generating payment modes
pub fn payment_mode_strategy() -> impl Strategy<Value = PaymentMode> {
    prop_oneof![
        Just(PaymentMode::Annual),
        Just(PaymentMode::SemiAnnual),
        Just(PaymentMode::Quarterly),
        Just(PaymentMode::Monthly),
    ]
}

/// Strategy for the accepted raw spellings of sex
pub fn sex_spelling_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("m".to_string()),
        Just("M".to_string()),
        Just("male".to_string()),
        Just("Male".to_string()),
        Just("f".to_string()),
        Just("F".to_string()),
        Just("female".to_string()),
        Just("FEMALE".to_string()),
    ]
}

/// Strategy for positive rate values (0.01 to 100.00)
pub fn rate_value_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for annual incomes (12k to 600k, whole dollars)
pub fn annual_income_strategy() -> impl Strategy<Value = Decimal> {
    (12_000i64..600_000i64).prop_map(|n| Decimal::new(n, 0))
}

/// Strategy for eligible disability inputs
///
/// Generated inputs always pass the disability eligibility checks.
pub fn disability_input_strategy() -> impl Strategy<Value = RateInput> {
    (
        18u32..=60u32,
        sex_spelling_strategy(),
        annual_income_strategy(),
    )
        .prop_map(|(age, sex, income)| {
            RateInputBuilder::new(ProductType::Disability)
                .age(age)
                .sex(sex)
                .state("NY")
                .occupation_class("4A")
                .uw_class("standard")
                .annual_income(income)
                .build()
        })
}
