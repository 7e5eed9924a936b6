//! Property & casualty rating
//!
//! One plugin owns every P&C line; exposure depends on the sub-line:
//! vehicle count for motor lines, insured value in thousands for property
//! lines, aggregate limit in millions for liability lines, and payroll in
//! hundreds for workers comp.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::input::{ProductType, RateInput};
use crate::plugin::{FactorSelector, Ineligibility, RatingPlugin};
use crate::rate_key::{RateKey, WILDCARD};

const PC_MIN_AGE: u32 = 16;
const PC_MAX_AGE: u32 = 90;

/// Insured-value dollars per exposure unit (property lines)
const PROPERTY_UNIT: Decimal = dec!(1000);
/// Aggregate-limit dollars per exposure unit (liability lines)
const LIABILITY_UNIT: Decimal = dec!(1000000);
/// Payroll dollars per exposure unit (workers comp)
const PAYROLL_UNIT: Decimal = dec!(100);

/// Vehicle model-year ages mapped to rate-key classes
const VEHICLE_NEW_MAX_AGE: i32 = 3;
const VEHICLE_MID_MAX_AGE: i32 = 10;

const DEFAULT_CONSTRUCTION: &str = "frame";

fn multi_vehicle(input: &RateInput) -> Option<String> {
    let count = input.insured_objects.iter().filter(|o| o.is_vehicle()).count();
    if count == 0 {
        return None;
    }
    Some(if count >= 2 { "yes" } else { "no" }.to_string())
}

fn construction(input: &RateInput) -> Option<String> {
    input
        .insured_objects
        .iter()
        .find_map(|o| o.construction_type.as_deref())
        .map(|c| c.trim().to_ascii_lowercase())
}

fn territory(input: &RateInput) -> Option<String> {
    input.normalized_state()
}

const AUTO_SELECTORS: &[(&str, FactorSelector)] = &[
    ("multi_vehicle", multi_vehicle),
    ("construction", construction),
    ("territory", territory),
];

/// Rates property & casualty products
#[derive(Debug, Default)]
pub struct PropertyCasualtyPlugin;

impl PropertyCasualtyPlugin {
    pub fn new() -> Self {
        Self
    }

    fn vehicle_count(&self, input: &RateInput) -> u32 {
        let count = input
            .insured_objects
            .iter()
            .filter(|o| o.is_vehicle())
            .count() as u32;
        count.max(1)
    }

    fn insured_value(&self, input: &RateInput) -> Decimal {
        let from_objects: Decimal = input
            .insured_objects
            .iter()
            .filter_map(|o| o.insured_value)
            .sum();
        if from_objects > Decimal::ZERO {
            return from_objects;
        }
        input
            .coverages
            .iter()
            .filter_map(|c| c.limit_amount)
            .max()
            .unwrap_or(Decimal::ZERO)
    }

    fn aggregate_limit(&self, input: &RateInput) -> Decimal {
        input
            .coverages
            .iter()
            .filter_map(|c| c.aggregate_limit.or(c.limit_amount))
            .max()
            .unwrap_or(Decimal::ZERO)
    }

    fn payroll(&self, input: &RateInput) -> Decimal {
        if let Some(payroll) = input.annual_payroll {
            return payroll;
        }
        input
            .insured_objects
            .iter()
            .filter_map(|o| o.annual_revenue)
            .sum()
    }

    fn newest_vehicle_year(&self, input: &RateInput) -> Option<i32> {
        input
            .insured_objects
            .iter()
            .filter(|o| o.is_vehicle())
            .filter_map(|o| o.vehicle_year)
            .max()
    }

    fn vehicle_age_class(&self, object_year: i32, as_of: NaiveDate) -> &'static str {
        let age = as_of.year() - object_year;
        if age <= VEHICLE_NEW_MAX_AGE {
            "new"
        } else if age <= VEHICLE_MID_MAX_AGE {
            "mid"
        } else {
            "old"
        }
    }

    fn descriptor(&self, input: &RateInput, as_of: NaiveDate) -> String {
        let line = input.product_type;
        if line.is_vehicle_line() {
            return match self.newest_vehicle_year(input) {
                Some(year) => self.vehicle_age_class(year, as_of).to_string(),
                None => WILDCARD.to_string(),
            };
        }
        if line.is_property_line() {
            return construction(input).unwrap_or_else(|| DEFAULT_CONSTRUCTION.to_string());
        }
        if line.is_liability_line() {
            return "liability".to_string();
        }
        match line {
            ProductType::WorkersComp => "wc".to_string(),
            _ => WILDCARD.to_string(),
        }
    }
}

impl RatingPlugin for PropertyCasualtyPlugin {
    fn name(&self) -> &'static str {
        "property_casualty"
    }

    fn product_types(&self) -> &'static [ProductType] {
        &[
            ProductType::Auto,
            ProductType::Motorcycle,
            ProductType::Boat,
            ProductType::Rv,
            ProductType::Homeowners,
            ProductType::Renters,
            ProductType::Condo,
            ProductType::GeneralLiability,
            ProductType::Umbrella,
            ProductType::WorkersComp,
        ]
    }

    fn check_eligibility(&self, input: &RateInput) -> Result<(), Ineligibility> {
        if input.normalized_state().is_none() {
            return Err(Ineligibility::new("state is required"));
        }

        // Applicants may be businesses; age is bounded only when present
        if let Some(age) = input.age {
            if age < PC_MIN_AGE || age > PC_MAX_AGE {
                return Err(Ineligibility::new(format!(
                    "age {age} is outside the issue range {PC_MIN_AGE}-{PC_MAX_AGE} for {}",
                    input.product_type
                )));
            }
        }

        if input.insured_objects.is_empty() && input.coverages.is_empty() {
            return Err(Ineligibility::new(
                "at least one insured object or coverage is required",
            ));
        }

        Ok(())
    }

    fn exposure(&self, input: &RateInput) -> Result<Decimal, Ineligibility> {
        let line = input.product_type;
        let exposure = if line.is_vehicle_line() {
            Decimal::from(self.vehicle_count(input))
        } else if line.is_property_line() {
            let value = self.insured_value(input);
            if value > Decimal::ZERO {
                value / PROPERTY_UNIT
            } else {
                dec!(1)
            }
        } else if line.is_liability_line() {
            let limit = self.aggregate_limit(input);
            if limit > Decimal::ZERO {
                limit / LIABILITY_UNIT
            } else {
                dec!(1)
            }
        } else if line == ProductType::WorkersComp {
            let payroll = self.payroll(input);
            if payroll > Decimal::ZERO {
                payroll / PAYROLL_UNIT
            } else {
                dec!(1)
            }
        } else {
            dec!(1)
        };
        Ok(exposure)
    }

    fn base_rate_key(&self, input: &RateInput, as_of: NaiveDate) -> RateKey {
        let state = input
            .normalized_state()
            .unwrap_or_else(|| WILDCARD.to_string());
        RateKey::new(vec![state, self.descriptor(input, as_of)])
    }

    fn fallback_keys(&self, base: &RateKey) -> Vec<RateKey> {
        // Drop the sub-line descriptor
        vec![base.with_wildcards(&[1])]
    }

    fn auto_select_factor(&self, factor_code: &str, input: &RateInput) -> Option<String> {
        AUTO_SELECTORS
            .iter()
            .find(|(code, _)| *code == factor_code)
            .and_then(|(_, select)| select(input))
    }
}
