//! Rating output value objects
//!
//! `RateOutput` carries the full, auditable breakdown of every number that
//! contributed to the final premium. It is built exactly once per rating
//! call through the ordered pipeline stages; there are no intermediate
//! persisted states. Either `eligible` is true and the breakdown is
//! complete, or it is false with a human-readable reason.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::input::PaymentMode;
use crate::tables::{FactorApplyMode, FeeApplyMode, FeeType, RiderApplyMode};

/// A factor that adjusted the premium
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedFactor {
    pub factor_code: String,
    pub label: String,
    pub option_value: String,
    pub apply_mode: FactorApplyMode,
    pub factor_value: Decimal,
}

/// A rider that was charged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedRider {
    pub rider_code: String,
    pub label: String,
    pub apply_mode: RiderApplyMode,
    pub rider_value: Decimal,
    /// Computed charge, rounded to 2 decimals
    pub charge: Decimal,
}

/// A fee or credit that was applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedFee {
    pub fee_code: String,
    pub label: String,
    pub fee_type: FeeType,
    pub apply_mode: FeeApplyMode,
    pub fee_value: Decimal,
    /// Signed applied amount, rounded to 2 decimals; credits are negative
    pub amount: Decimal,
}

/// The result of one rating call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateOutput {
    /// False for any business ineligibility (a normal outcome)
    pub eligible: bool,
    /// Human-readable reason when ineligible
    pub ineligible_reason: Option<String>,
    /// Version of the rating engine that produced this output
    pub engine_version: String,
    /// Version of the rate table used, when one was resolved
    pub rate_table_version: Option<u32>,
    /// Normalized exposure scalar the base rate was multiplied by
    pub exposure: Decimal,
    /// Resolved base-rate key (possibly wildcarded by fallback)
    pub base_rate_key: Option<String>,
    /// Rate value of the resolved base entry
    pub base_rate_value: Option<Decimal>,
    /// rate_value x exposure, rounded to 2 decimals
    pub base_premium: Decimal,
    /// Premium after factor application, rounded to 2 decimals
    pub premium_factored: Decimal,
    pub factors_applied: Vec<AppliedFactor>,
    /// Premium after rider charges, rounded to 2 decimals
    pub premium_with_riders: Decimal,
    pub riders_applied: Vec<AppliedRider>,
    /// Final annual premium after fees/credits, floored at zero
    pub premium_annual: Decimal,
    pub fees_applied: Vec<AppliedFee>,
    /// Annual premium converted to the requested payment mode
    pub premium_modal: Decimal,
    pub modal_mode: PaymentMode,
    pub modal_factor: Decimal,
    pub modal_fee: Decimal,
}

impl RateOutput {
    /// Builds an ineligible outcome
    ///
    /// Numeric fields are zeroed; `rate_table_version` is carried when the
    /// failure happened after a table was resolved.
    pub fn ineligible(
        engine_version: impl Into<String>,
        rate_table_version: Option<u32>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            eligible: false,
            ineligible_reason: Some(reason.into()),
            engine_version: engine_version.into(),
            rate_table_version,
            exposure: Decimal::ZERO,
            base_rate_key: None,
            base_rate_value: None,
            base_premium: Decimal::ZERO,
            premium_factored: Decimal::ZERO,
            factors_applied: Vec::new(),
            premium_with_riders: Decimal::ZERO,
            riders_applied: Vec::new(),
            premium_annual: Decimal::ZERO,
            fees_applied: Vec::new(),
            premium_modal: Decimal::ZERO,
            modal_mode: PaymentMode::Annual,
            modal_factor: Decimal::ZERO,
            modal_fee: Decimal::ZERO,
        }
    }
}
