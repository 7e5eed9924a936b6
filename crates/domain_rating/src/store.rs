//! Rate data store port and snapshot
//!
//! The rating engine never reads rate rows directly from persistence.
//! `RateStore::active_snapshot` resolves the one table that is "active for"
//! a (product type, version, carrier) and returns an owned
//! [`RateDataSnapshot`] of its rows. The whole rating run works against
//! that immutable copy, so concurrent authoring edits cannot tear a run.
//!
//! The trait is synchronous: rating is a request-scoped pure computation,
//! and adapters over real persistence perform their reads up front when the
//! snapshot is taken.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use thiserror::Error;

use core_kernel::CarrierId;

use crate::input::{PaymentMode, ProductType};
use crate::tables::{
    RateFactor, RateFee, RateModalFactor, RateRider, RateTable, RateTableEntry,
};

/// Errors raised by rate-store adapters
///
/// These are system failures, never business ineligibility.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Rate store unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed rate data: {0}")]
    Malformed(String),
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        StoreError::Unavailable(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        StoreError::Malformed(message.into())
    }
}

/// An immutable copy of one rate table and all its rows
#[derive(Debug, Clone)]
pub struct RateDataSnapshot {
    pub table: RateTable,
    entries: Vec<RateTableEntry>,
    factors: Vec<RateFactor>,
    riders: Vec<RateRider>,
    fees: Vec<RateFee>,
    modal_factors: Vec<RateModalFactor>,
}

impl RateDataSnapshot {
    /// Assembles a snapshot from a table and its rows
    pub fn new(
        table: RateTable,
        entries: Vec<RateTableEntry>,
        factors: Vec<RateFactor>,
        riders: Vec<RateRider>,
        fees: Vec<RateFee>,
        modal_factors: Vec<RateModalFactor>,
    ) -> Self {
        Self {
            table,
            entries,
            factors,
            riders,
            fees,
            modal_factors,
        }
    }

    /// Finds the base entry for an exact rate key
    ///
    /// Duplicate keys are a data-authoring defect; the first row in table
    /// order wins deterministically.
    pub fn find_entry(&self, rate_key: &str) -> Option<&RateTableEntry> {
        self.entries.iter().find(|e| e.rate_key == rate_key)
    }

    /// Returns factor rows grouped by code
    ///
    /// Groups are ordered by (minimum sort_order, code); rows within a
    /// group by (sort_order, option_value). The ordering is total, so factor
    /// application is deterministic regardless of authoring order.
    pub fn factor_groups(&self) -> Vec<(String, Vec<&RateFactor>)> {
        let mut by_code: BTreeMap<String, Vec<&RateFactor>> = BTreeMap::new();
        for factor in &self.factors {
            by_code.entry(factor.factor_code.clone()).or_default().push(factor);
        }

        let mut groups: Vec<(String, Vec<&RateFactor>)> = by_code.into_iter().collect();
        for (_, rows) in groups.iter_mut() {
            rows.sort_by(|a, b| {
                a.sort_order
                    .cmp(&b.sort_order)
                    .then_with(|| a.option_value.cmp(&b.option_value))
            });
        }
        groups.sort_by_key(|(code, rows)| {
            let min_order = rows.iter().map(|r| r.sort_order).min().unwrap_or(0);
            (min_order, code.clone())
        });
        groups
    }

    /// Returns rider rows in application order
    pub fn riders_sorted(&self) -> Vec<&RateRider> {
        let mut riders: Vec<&RateRider> = self.riders.iter().collect();
        riders.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.rider_code.cmp(&b.rider_code))
        });
        riders
    }

    /// Returns fee rows in application order
    pub fn fees_sorted(&self) -> Vec<&RateFee> {
        let mut fees: Vec<&RateFee> = self.fees.iter().collect();
        fees.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.fee_code.cmp(&b.fee_code))
        });
        fees
    }

    /// Returns the modal row for a payment mode, if the table defines one
    pub fn modal_factor(&self, mode: PaymentMode) -> Option<&RateModalFactor> {
        self.modal_factors.iter().find(|m| m.mode == mode)
    }
}

/// Read-only port over versioned rate data
///
/// Implementations must treat rate data as immutable for the duration of a
/// snapshot; the engine holds no other reference to the store's rows.
pub trait RateStore: Send + Sync {
    /// Resolves the active snapshot for (product type, version, carrier)
    ///
    /// "Active for" means: `is_active`, effective window contains `as_of`,
    /// version matches when one is requested, and the carrier matches
    /// exactly or the table is carrier-agnostic. Carrier-exact tables win
    /// over agnostic ones; among those, the latest effective start wins.
    ///
    /// Returns `Ok(None)` when no table qualifies - a business
    /// ineligibility, not an error.
    fn active_snapshot(
        &self,
        product_type: ProductType,
        version: Option<u32>,
        carrier: Option<CarrierId>,
        as_of: NaiveDate,
    ) -> Result<Option<RateDataSnapshot>, StoreError>;
}

/// In-memory rate store
///
/// Reference adapter used by tests and embedders that load rate data
/// ahead of time.
#[derive(Debug, Default)]
pub struct InMemoryRateStore {
    snapshots: Vec<RateDataSnapshot>,
}

impl InMemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a snapshot to the store
    pub fn insert(&mut self, snapshot: RateDataSnapshot) {
        self.snapshots.push(snapshot);
    }

    /// Builder-style insertion
    pub fn with_snapshot(mut self, snapshot: RateDataSnapshot) -> Self {
        self.insert(snapshot);
        self
    }
}

impl RateStore for InMemoryRateStore {
    fn active_snapshot(
        &self,
        product_type: ProductType,
        version: Option<u32>,
        carrier: Option<CarrierId>,
        as_of: NaiveDate,
    ) -> Result<Option<RateDataSnapshot>, StoreError> {
        let best = self
            .snapshots
            .iter()
            .filter(|s| s.table.product_type == product_type)
            .filter(|s| s.table.is_effective_on(as_of))
            .filter(|s| version.map_or(true, |v| s.table.version == v))
            .filter(|s| match (carrier, s.table.carrier_id) {
                // Carrier-specific requests may use that carrier's tables
                // or carrier-agnostic ones; agnostic requests only the latter.
                (Some(wanted), Some(owned)) => wanted == owned,
                (_, None) => true,
                (None, Some(_)) => false,
            })
            .max_by_key(|s| {
                let carrier_exact = carrier.is_some() && s.table.carrier_id == carrier;
                (carrier_exact, s.table.effective.start, s.table.version)
            });

        Ok(best.cloned())
    }
}
