//! Versioned rate-table data model
//!
//! Five record families hang off a `RateTable`: base entries, factors,
//! riders, fees, and modal factors. All of them are read-only during rating;
//! they are created and versioned by an external authoring process.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{CarrierId, EffectiveWindow, RateTableId};

use crate::input::{PaymentMode, ProductType};

/// A versioned set of rate data for one product type
///
/// At most one table is active for a given (product type, version, carrier)
/// at lookup time. "Active for" resolution is a pure query over the active
/// flag and the effective window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub id: RateTableId,
    pub product_type: ProductType,
    pub version: u32,
    /// Carrier the table belongs to; None means carrier-agnostic
    pub carrier_id: Option<CarrierId>,
    pub effective: EffectiveWindow,
    pub is_active: bool,
    pub description: Option<String>,
}

impl RateTable {
    /// Creates an active table effective from the given date, unbounded
    pub fn new(product_type: ProductType, version: u32, effective_from: NaiveDate) -> Self {
        Self {
            id: RateTableId::new(),
            product_type,
            version,
            carrier_id: None,
            effective: EffectiveWindow::from(effective_from),
            is_active: true,
            description: None,
        }
    }

    /// Returns true if the table may be used for rating on the given date
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        self.is_active && self.effective.contains(date)
    }
}

/// One base-rate row within a table
///
/// `rate_key` is a composite of normalized rating dimensions joined by `|`,
/// with `*` encoding a wildcard segment. Keys are unique within a table;
/// a duplicate is a data-authoring defect, and lookup deterministically
/// returns the first row in table order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTableEntry {
    pub table_id: RateTableId,
    pub rate_key: String,
    pub rate_value: Decimal,
}

/// How a factor option adjusts the running premium
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorApplyMode {
    Multiply,
    Add,
    Subtract,
}

/// One selectable option within a factor group
///
/// Rows sharing a `factor_code` form a group; exactly one option per group
/// is applied, chosen by explicit caller selection or a per-plugin
/// auto-selection rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateFactor {
    pub table_id: RateTableId,
    pub factor_code: String,
    pub label: String,
    pub option_value: String,
    pub apply_mode: FactorApplyMode,
    pub factor_value: Decimal,
    pub sort_order: i32,
}

/// How a rider charge is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiderApplyMode {
    /// Charge = rider_value x exposure
    Add,
    /// Charge = premium_after_factors x (rider_value - 1)
    Multiply,
}

/// An optional coverage add-on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRider {
    pub table_id: RateTableId,
    pub rider_code: String,
    pub label: String,
    pub apply_mode: RiderApplyMode,
    pub rider_value: Decimal,
    /// Applied when the caller made no explicit selection for this code
    pub is_default: bool,
    pub sort_order: i32,
}

/// Whether a fee row charges or credits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeType {
    Fee,
    Credit,
}

/// How a fee amount is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeApplyMode {
    /// Flat amount
    Add,
    /// Percentage of the running premium
    Percent,
}

/// A flat or percentage adjustment applied after riders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateFee {
    pub table_id: RateTableId,
    pub fee_code: String,
    pub label: String,
    pub fee_type: FeeType,
    pub apply_mode: FeeApplyMode,
    pub fee_value: Decimal,
    pub sort_order: i32,
}

/// Modal conversion row for one payment mode
///
/// Unique per (table, mode).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateModalFactor {
    pub table_id: RateTableId,
    pub mode: PaymentMode,
    /// Multiplier applied to the annual premium
    pub factor: Decimal,
    /// Flat amount added per modal payment
    pub flat_fee: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_table_effective_requires_active_flag() {
        let mut table = RateTable::new(ProductType::Life, 1, date(2025, 1, 1));
        assert!(table.is_effective_on(date(2025, 6, 1)));

        table.is_active = false;
        assert!(!table.is_effective_on(date(2025, 6, 1)));
    }

    #[test]
    fn test_table_effective_respects_window() {
        let table = RateTable::new(ProductType::Life, 1, date(2025, 1, 1));
        assert!(!table.is_effective_on(date(2024, 12, 31)));
    }

    #[test]
    fn test_apply_mode_serde_spelling() {
        assert_eq!(
            serde_json::to_string(&FactorApplyMode::Multiply).unwrap(),
            "\"multiply\""
        );
        assert_eq!(serde_json::to_string(&FeeType::Credit).unwrap(), "\"credit\"");
        assert_eq!(
            serde_json::to_string(&FeeApplyMode::Percent).unwrap(),
            "\"percent\""
        );
    }

    #[test]
    fn test_entry_round_trips() {
        let entry = RateTableEntry {
            table_id: RateTableId::new(),
            rate_key: "35|M|NY|4A|standard".to_string(),
            rate_value: dec!(2.50),
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: RateTableEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
    }
}
