//! Life rating
//!
//! Exposure is face amount in thousands, read from a death-benefit coverage
//! record with a metadata fallback. The rate key carries a tobacco
//! indicator instead of state.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::input::{ProductType, RateInput, Sex};
use crate::plugin::{selectors, FactorSelector, Ineligibility, RatingPlugin};
use crate::rate_key::{RateKey, WILDCARD};

const LIFE_MIN_AGE: u32 = 18;
const LIFE_MAX_AGE: u32 = 85;

/// Face dollars per exposure unit
const FACE_UNIT: Decimal = dec!(1000);

const TOBACCO_SEGMENT: &str = "T";
const NON_TOBACCO_SEGMENT: &str = "NT";

const AUTO_SELECTORS: &[(&str, FactorSelector)] = &[
    ("tobacco", selectors::tobacco),
    ("bmi", selectors::bmi_category),
];

/// Rates life products
#[derive(Debug, Default)]
pub struct LifePlugin;

impl LifePlugin {
    pub fn new() -> Self {
        Self
    }

    /// Face amount from the death-benefit coverage, else metadata
    fn face_amount(&self, input: &RateInput) -> Option<Decimal> {
        let from_coverage = input
            .coverages
            .iter()
            .find(|c| {
                let matches = |field: &Option<String>| {
                    field
                        .as_deref()
                        .map(|v| v.eq_ignore_ascii_case("death_benefit"))
                        .unwrap_or(false)
                };
                matches(&c.coverage_type) || matches(&c.coverage_category)
            })
            .and_then(|c| c.benefit_amount);

        from_coverage.or_else(|| {
            input
                .metadata
                .get("face_amount")
                .and_then(|value| serde_json::from_value::<Decimal>(value.clone()).ok())
        })
    }

    fn tobacco_segment(&self, input: &RateInput) -> &'static str {
        match input.tobacco_use {
            Some(true) => TOBACCO_SEGMENT,
            _ => NON_TOBACCO_SEGMENT,
        }
    }
}

impl RatingPlugin for LifePlugin {
    fn name(&self) -> &'static str {
        "life"
    }

    fn product_types(&self) -> &'static [ProductType] {
        &[ProductType::Life]
    }

    fn check_eligibility(&self, input: &RateInput) -> Result<(), Ineligibility> {
        let age = input
            .age
            .ok_or_else(|| Ineligibility::new("age is required"))?;
        if age < LIFE_MIN_AGE || age > LIFE_MAX_AGE {
            return Err(Ineligibility::new(format!(
                "age {age} is outside the issue range {LIFE_MIN_AGE}-{LIFE_MAX_AGE} for life"
            )));
        }

        match &input.sex {
            None => return Err(Ineligibility::new("sex is required")),
            Some(raw) if Sex::parse(raw).is_none() => {
                return Err(Ineligibility::new(format!("sex '{raw}' is not recognized")));
            }
            Some(_) => {}
        }

        if input.normalized_state().is_none() {
            return Err(Ineligibility::new("state is required"));
        }

        match self.face_amount(input) {
            Some(face) if face > Decimal::ZERO => Ok(()),
            Some(_) => Err(Ineligibility::new("face amount must be positive")),
            None => Err(Ineligibility::new(
                "a death benefit face amount is required for life rating",
            )),
        }
    }

    fn exposure(&self, input: &RateInput) -> Result<Decimal, Ineligibility> {
        let face = self.face_amount(input).ok_or_else(|| {
            Ineligibility::new("a death benefit face amount is required for life rating")
        })?;
        Ok(face / FACE_UNIT)
    }

    fn base_rate_key(&self, input: &RateInput, _as_of: NaiveDate) -> RateKey {
        let age = input
            .age
            .map(|a| a.to_string())
            .unwrap_or_else(|| WILDCARD.to_string());
        let sex = input
            .normalized_sex()
            .map(|s| s.key_segment().to_string())
            .unwrap_or_else(|| WILDCARD.to_string());
        let tobacco = self.tobacco_segment(input).to_string();
        let uw = input
            .uw_class
            .as_deref()
            .map(|c| c.trim().to_ascii_lowercase())
            .unwrap_or_else(|| WILDCARD.to_string());
        RateKey::new(vec![age, sex, tobacco, uw])
    }

    fn fallback_keys(&self, base: &RateKey) -> Vec<RateKey> {
        // Drop the underwriting class only
        vec![base.with_wildcards(&[3])]
    }

    fn auto_select_factor(&self, factor_code: &str, input: &RateInput) -> Option<String> {
        AUTO_SELECTORS
            .iter()
            .find(|(code, _)| *code == factor_code)
            .and_then(|(_, select)| select(input))
    }
}
