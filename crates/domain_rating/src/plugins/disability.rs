//! Disability and long-term-care rating
//!
//! One plugin owns both products: they share factor auto-selection and key
//! style, but eligibility ages differ and LTC has no income check. DI
//! normalizes exposure from insurable monthly income; LTC from the daily
//! benefit.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::input::{ProductType, RateInput, Sex};
use crate::plugin::{selectors, FactorSelector, Ineligibility, RatingPlugin};
use crate::rate_key::{RateKey, WILDCARD};

const DI_MIN_AGE: u32 = 18;
const DI_MAX_AGE: u32 = 60;
const LTC_MIN_AGE: u32 = 40;
const LTC_MAX_AGE: u32 = 79;

/// Benefit dollars per exposure unit (DI)
const DI_BENEFIT_UNIT: Decimal = dec!(100);
/// Daily-benefit dollars per exposure unit (LTC)
const LTC_BENEFIT_UNIT: Decimal = dec!(10);
/// Daily benefit assumed when no LTC coverage record carries one
const LTC_DEFAULT_DAILY_BENEFIT: Decimal = dec!(150);

/// Replacement ratio when the band table yields nothing
const DEFAULT_REPLACEMENT_RATIO: Decimal = dec!(0.60);

/// Ascending income-band ceilings and their replacement ratios
///
/// Compared against monthly income after the annual-to-monthly
/// conversion; None is the open-ended top band.
const REPLACEMENT_RATIO_BANDS: [(Option<Decimal>, Decimal); 5] = [
    (Some(dec!(5000)), dec!(0.70)),
    (Some(dec!(10000)), dec!(0.65)),
    (Some(dec!(15000)), dec!(0.60)),
    (Some(dec!(25000)), dec!(0.55)),
    (None, dec!(0.50)),
];

fn replacement_ratio(monthly_income: Decimal) -> Decimal {
    for (ceiling, ratio) in REPLACEMENT_RATIO_BANDS {
        match ceiling {
            Some(limit) if monthly_income <= limit => return ratio,
            None => return ratio,
            _ => {}
        }
    }
    DEFAULT_REPLACEMENT_RATIO
}

fn elimination_period(input: &RateInput) -> Option<String> {
    input.elimination_period_days.map(|days| days.to_string())
}

fn benefit_period(input: &RateInput) -> Option<String> {
    input.benefit_period.clone()
}

fn definition_of_disability(input: &RateInput) -> Option<String> {
    input.definition_of_disability.clone()
}

const AUTO_SELECTORS: &[(&str, FactorSelector)] = &[
    ("tobacco", selectors::tobacco),
    ("bmi", selectors::bmi_category),
    ("elimination_period", elimination_period),
    ("benefit_period", benefit_period),
    ("definition_of_disability", definition_of_disability),
];

/// Rates disability income and long-term-care products
#[derive(Debug, Default)]
pub struct DisabilityPlugin;

impl DisabilityPlugin {
    pub fn new() -> Self {
        Self
    }

    fn check_common(
        &self,
        input: &RateInput,
        min_age: u32,
        max_age: u32,
    ) -> Result<(), Ineligibility> {
        let age = input
            .age
            .ok_or_else(|| Ineligibility::new("age is required"))?;
        if age < min_age || age > max_age {
            return Err(Ineligibility::new(format!(
                "age {age} is outside the issue range {min_age}-{max_age} for {}",
                input.product_type
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

        Ok(())
    }

    /// Insurable monthly benefit for DI after the replacement-ratio cap
    /// and existing-coverage offset
    fn approved_monthly_benefit(&self, input: &RateInput) -> Result<Decimal, Ineligibility> {
        let annual_income = input
            .annual_income
            .ok_or_else(|| Ineligibility::new("annual income is required for disability rating"))?;
        let monthly_income = annual_income / dec!(12);
        let ratio = replacement_ratio(monthly_income);
        let existing = input.existing_coverage_monthly.unwrap_or(Decimal::ZERO);
        let max_benefit = monthly_income * ratio - existing;

        let requested = input.monthly_benefit_requested.unwrap_or(max_benefit);
        let approved = requested.min(max_benefit);
        if approved <= Decimal::ZERO {
            return Err(Ineligibility::new(
                "no insurable monthly benefit remains after existing coverage",
            ));
        }
        Ok(approved)
    }

    fn ltc_daily_benefit(&self, input: &RateInput) -> Decimal {
        input
            .coverages
            .iter()
            .find(|c| {
                let matches = |field: &Option<String>, wanted: &str| {
                    field
                        .as_deref()
                        .map(|v| v.eq_ignore_ascii_case(wanted))
                        .unwrap_or(false)
                };
                matches(&c.coverage_category, "long_term_care")
                    || matches(&c.coverage_type, "long_term_care")
                    || matches(&c.coverage_type, "daily_benefit")
            })
            .and_then(|c| c.benefit_amount)
            .unwrap_or(LTC_DEFAULT_DAILY_BENEFIT)
    }
}

impl RatingPlugin for DisabilityPlugin {
    fn name(&self) -> &'static str {
        "disability"
    }

    fn product_types(&self) -> &'static [ProductType] {
        &[ProductType::Disability, ProductType::LongTermCare]
    }

    fn check_eligibility(&self, input: &RateInput) -> Result<(), Ineligibility> {
        match input.product_type {
            ProductType::Disability => {
                self.check_common(input, DI_MIN_AGE, DI_MAX_AGE)?;
                match input.annual_income {
                    Some(income) if income > Decimal::ZERO => Ok(()),
                    Some(_) => Err(Ineligibility::new(
                        "annual income must be positive for disability rating",
                    )),
                    None => Err(Ineligibility::new(
                        "annual income is required for disability rating",
                    )),
                }
            }
            _ => self.check_common(input, LTC_MIN_AGE, LTC_MAX_AGE),
        }
    }

    fn exposure(&self, input: &RateInput) -> Result<Decimal, Ineligibility> {
        match input.product_type {
            ProductType::Disability => {
                let approved = self.approved_monthly_benefit(input)?;
                Ok(approved / DI_BENEFIT_UNIT)
            }
            _ => Ok(self.ltc_daily_benefit(input) / LTC_BENEFIT_UNIT),
        }
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
        let state = input
            .normalized_state()
            .unwrap_or_else(|| WILDCARD.to_string());

        match input.product_type {
            ProductType::Disability => {
                let occupation = input
                    .occupation_class
                    .as_deref()
                    .map(|c| c.trim().to_ascii_uppercase())
                    .unwrap_or_else(|| WILDCARD.to_string());
                let uw = input
                    .uw_class
                    .as_deref()
                    .map(|c| c.trim().to_ascii_lowercase())
                    .unwrap_or_else(|| WILDCARD.to_string());
                RateKey::new(vec![age, sex, state, occupation, uw])
            }
            _ => RateKey::new(vec![age, sex, state]),
        }
    }

    fn fallback_keys(&self, base: &RateKey) -> Vec<RateKey> {
        match base.len() {
            // DI: drop state, then underwriting class
            5 => vec![base.with_wildcards(&[2]), base.with_wildcards(&[2, 4])],
            // LTC: drop state
            _ => vec![base.with_wildcards(&[2])],
        }
    }

    fn auto_select_factor(&self, factor_code: &str, input: &RateInput) -> Option<String> {
        AUTO_SELECTORS
            .iter()
            .find(|(code, _)| *code == factor_code)
            .and_then(|(_, select)| select(input))
    }
}
