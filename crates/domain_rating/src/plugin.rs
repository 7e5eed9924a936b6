//! The rating plugin contract
//!
//! Plugins differ only in eligibility rules, exposure normalization, and
//! rate-key construction; everything downstream (factors, riders, fees,
//! modal conversion) is the shared pipeline. Factor auto-selection is an
//! enumerated per-plugin mapping from factor code to an extraction function
//! over the input, rather than scattered conditionals.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::input::{ProductType, RateInput};
use crate::rate_key::RateKey;

/// A business ineligibility outcome
///
/// Expected and non-exceptional: carried as a value, surfaced to callers
/// as `eligible = false` with this reason, and recorded verbatim in the
/// rating run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ineligibility {
    pub reason: String,
}

impl Ineligibility {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)
    }
}

/// An extraction function resolving a factor option from the input
pub type FactorSelector = fn(&RateInput) -> Option<String>;

/// Contract implemented by each product-family plugin
pub trait RatingPlugin: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// The product types this plugin owns
    fn product_types(&self) -> &'static [ProductType];

    /// Validates required fields before any numeric work
    fn check_eligibility(&self, input: &RateInput) -> Result<(), Ineligibility>;

    /// Converts the request into the exposure scalar the base rate scales by
    ///
    /// May still fail eligibility (e.g. no remaining benefit capacity).
    fn exposure(&self, input: &RateInput) -> Result<Decimal, Ineligibility>;

    /// Builds the exact rate key from normalized dimensions
    ///
    /// Called only after eligibility passes; missing optional dimensions
    /// encode as wildcard segments.
    fn base_rate_key(&self, input: &RateInput, as_of: NaiveDate) -> RateKey;

    /// Derives the fixed wildcard-fallback chain for a missed exact key
    ///
    /// Ordered most-specific first; the engine tries the exact key, then
    /// each returned key in order.
    fn fallback_keys(&self, base: &RateKey) -> Vec<RateKey>;

    /// Enumerated auto-selection for a factor group the caller left
    /// unselected
    ///
    /// Returns the option value to apply, or None to skip the group.
    fn auto_select_factor(&self, factor_code: &str, input: &RateInput) -> Option<String>;
}

/// Shared factor selectors used by multiple plugins
pub(crate) mod selectors {
    use super::*;

    /// "smoker" / "non_smoker" from the tobacco flag
    pub fn tobacco(input: &RateInput) -> Option<String> {
        input.tobacco_use.map(|smokes| {
            if smokes {
                "smoker".to_string()
            } else {
                "non_smoker".to_string()
            }
        })
    }

    /// BMI category from height and weight
    ///
    /// BMI = weight_lbs x 703 / height_inches^2
    pub fn bmi_category(input: &RateInput) -> Option<String> {
        let height = input.height_inches?;
        let weight = input.weight_lbs?;
        if height <= Decimal::ZERO || weight <= Decimal::ZERO {
            return None;
        }
        let bmi = weight * dec!(703) / (height * height);
        let category = if bmi < dec!(18.5) {
            "underweight"
        } else if bmi < dec!(25) {
            "normal"
        } else if bmi < dec!(30) {
            "overweight"
        } else {
            "obese"
        };
        Some(category.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ProductType;

    #[test]
    fn test_tobacco_selector() {
        let mut input = RateInput::new(ProductType::Life);
        assert_eq!(selectors::tobacco(&input), None);

        input.tobacco_use = Some(true);
        assert_eq!(selectors::tobacco(&input).as_deref(), Some("smoker"));

        input.tobacco_use = Some(false);
        assert_eq!(selectors::tobacco(&input).as_deref(), Some("non_smoker"));
    }

    #[test]
    fn test_bmi_selector_categories() {
        let mut input = RateInput::new(ProductType::Disability);
        assert_eq!(selectors::bmi_category(&input), None);

        // 70in, 150lbs -> BMI ~21.5
        input.height_inches = Some(dec!(70));
        input.weight_lbs = Some(dec!(150));
        assert_eq!(selectors::bmi_category(&input).as_deref(), Some("normal"));

        // 70in, 230lbs -> BMI ~33.0
        input.weight_lbs = Some(dec!(230));
        assert_eq!(selectors::bmi_category(&input).as_deref(), Some("obese"));

        // 70in, 120lbs -> BMI ~17.2
        input.weight_lbs = Some(dec!(120));
        assert_eq!(
            selectors::bmi_category(&input).as_deref(),
            Some("underweight")
        );
    }
}
