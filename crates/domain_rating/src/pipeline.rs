//! Shared pipeline stages
//!
//! Applied identically regardless of product family: base-rate resolution
//! with wildcard fallback, then factors, riders, fees/credits, and modal
//! conversion. Each stage is a pure function over (snapshot, input, running
//! premium). Running premiums keep full decimal precision between stages;
//! only the amounts recorded in the breakdown are rounded.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use core_kernel::rounding::{floor_at_zero, round_currency};

use crate::input::{PaymentMode, RateInput};
use crate::output::{AppliedFactor, AppliedFee, AppliedRider};
use crate::plugin::RatingPlugin;
use crate::rate_key::RateKey;
use crate::store::RateDataSnapshot;
use crate::tables::{FactorApplyMode, FeeApplyMode, FeeType, RiderApplyMode};

/// A resolved base-rate row
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBaseRate {
    /// The key that matched (possibly wildcarded by fallback)
    pub rate_key: String,
    pub rate_value: Decimal,
}

/// Resolves a base entry by trying each candidate key in order
///
/// Candidates are the exact key followed by the plugin's fixed fallback
/// chain. Returns None when the chain is exhausted.
pub fn resolve_base_rate(
    snapshot: &RateDataSnapshot,
    candidates: &[RateKey],
) -> Option<ResolvedBaseRate> {
    for (attempt, key) in candidates.iter().enumerate() {
        let key_str = key.to_string();
        if let Some(entry) = snapshot.find_entry(&key_str) {
            if attempt > 0 {
                debug!(rate_key = %key_str, attempt, "base rate resolved via fallback");
            }
            return Some(ResolvedBaseRate {
                rate_key: key_str,
                rate_value: entry.rate_value,
            });
        }
    }
    None
}

/// Result of the factor stage
#[derive(Debug, Clone)]
pub struct FactorOutcome {
    /// Running premium after all applied factors, full precision
    pub premium: Decimal,
    pub applied: Vec<AppliedFactor>,
}

/// Applies the table's factor groups to the base premium
///
/// For each group: the selected option is the caller's explicit selection,
/// else the plugin's auto-selection, else the group is skipped. A selection
/// naming an option the table does not price also skips the group.
pub fn apply_factors(
    snapshot: &RateDataSnapshot,
    input: &RateInput,
    plugin: &dyn RatingPlugin,
    base_premium: Decimal,
) -> FactorOutcome {
    let mut premium = base_premium;
    let mut applied = Vec::new();

    for (code, rows) in snapshot.factor_groups() {
        let selection = input
            .factor_selections
            .get(&code)
            .cloned()
            .or_else(|| plugin.auto_select_factor(&code, input));

        let Some(option_value) = selection else {
            continue;
        };
        let Some(row) = rows.iter().find(|r| r.option_value == option_value) else {
            continue;
        };

        premium = match row.apply_mode {
            FactorApplyMode::Multiply => premium * row.factor_value,
            FactorApplyMode::Add => premium + row.factor_value,
            FactorApplyMode::Subtract => premium - row.factor_value,
        };
        applied.push(AppliedFactor {
            factor_code: row.factor_code.clone(),
            label: row.label.clone(),
            option_value: row.option_value.clone(),
            apply_mode: row.apply_mode,
            factor_value: row.factor_value,
        });
    }

    FactorOutcome { premium, applied }
}

/// Result of the rider stage
#[derive(Debug, Clone)]
pub struct RiderOutcome {
    /// Running premium after all rider charges, full precision
    pub premium: Decimal,
    pub applied: Vec<AppliedRider>,
}

/// Applies rider charges in sort order
///
/// A rider applies when explicitly selected, or when it is a default and
/// the caller made no selection for its code; an explicit `false`
/// suppresses a default. Add-mode riders charge per exposure unit;
/// multiply-mode riders charge against the factored premium, so multiple
/// multiply riders do not compound.
pub fn apply_riders(
    snapshot: &RateDataSnapshot,
    input: &RateInput,
    exposure: Decimal,
    premium_after_factors: Decimal,
) -> RiderOutcome {
    let mut premium = premium_after_factors;
    let mut applied = Vec::new();

    for rider in snapshot.riders_sorted() {
        let selected = input.rider_selections.get(&rider.rider_code).copied();
        let applies = match selected {
            Some(choice) => choice,
            None => rider.is_default,
        };
        if !applies {
            continue;
        }

        let charge = match rider.apply_mode {
            RiderApplyMode::Add => rider.rider_value * exposure,
            RiderApplyMode::Multiply => premium_after_factors * (rider.rider_value - dec!(1)),
        };
        premium += charge;
        applied.push(AppliedRider {
            rider_code: rider.rider_code.clone(),
            label: rider.label.clone(),
            apply_mode: rider.apply_mode,
            rider_value: rider.rider_value,
            charge: round_currency(charge),
        });
    }

    RiderOutcome { premium, applied }
}

/// Result of the fee stage
#[derive(Debug, Clone)]
pub struct FeeOutcome {
    /// Final annual premium, floored at zero, full precision
    pub premium: Decimal,
    pub applied: Vec<AppliedFee>,
}

/// Applies fees and credits in sort order, then floors at zero
pub fn apply_fees(snapshot: &RateDataSnapshot, premium_with_riders: Decimal) -> FeeOutcome {
    let mut premium = premium_with_riders;
    let mut applied = Vec::new();

    for fee in snapshot.fees_sorted() {
        let amount = match fee.apply_mode {
            FeeApplyMode::Add => fee.fee_value,
            FeeApplyMode::Percent => premium * fee.fee_value / dec!(100),
        };
        let signed = match fee.fee_type {
            FeeType::Fee => {
                premium += amount;
                amount
            }
            FeeType::Credit => {
                premium -= amount.abs();
                -amount.abs()
            }
        };
        applied.push(AppliedFee {
            fee_code: fee.fee_code.clone(),
            label: fee.label.clone(),
            fee_type: fee.fee_type,
            apply_mode: fee.apply_mode,
            fee_value: fee.fee_value,
            amount: round_currency(signed),
        });
    }

    FeeOutcome {
        premium: floor_at_zero(premium),
        applied,
    }
}

/// Result of the modal stage
#[derive(Debug, Clone, PartialEq)]
pub struct ModalOutcome {
    /// Annual premium converted to the payment mode, rounded to 2 decimals
    pub premium_modal: Decimal,
    pub factor: Decimal,
    pub flat_fee: Decimal,
}

/// Hardcoded modal defaults used when a table defines no row for the mode
pub fn default_modal_terms(mode: PaymentMode) -> (Decimal, Decimal) {
    let factor = match mode {
        PaymentMode::Annual => dec!(1.0),
        PaymentMode::SemiAnnual => dec!(0.52),
        PaymentMode::Quarterly => dec!(0.265),
        PaymentMode::Monthly => dec!(0.0875),
    };
    (factor, Decimal::ZERO)
}

/// Converts the annual premium to the requested payment mode
pub fn apply_modal(
    snapshot: &RateDataSnapshot,
    mode: PaymentMode,
    premium_annual: Decimal,
) -> ModalOutcome {
    let (factor, flat_fee) = match snapshot.modal_factor(mode) {
        Some(row) => (row.factor, row.flat_fee),
        None => default_modal_terms(mode),
    };
    ModalOutcome {
        premium_modal: round_currency(premium_annual * factor + flat_fee),
        factor,
        flat_fee,
    }
}
