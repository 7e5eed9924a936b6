//! Test Data Builders
//!
//! Provides builder patterns for constructing rate data and rating inputs
//! with sensible defaults. Tests specify only the fields they care about.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use core_kernel::CarrierId;
use domain_rating::{
    CoverageInput, FactorApplyMode, FeeApplyMode, FeeType, InsuredObject, PaymentMode,
    ProductType, RateDataSnapshot, RateFactor, RateFee, RateInput, RateModalFactor, RateRider,
    RateTable, RateTableEntry, RiderApplyMode,
};

use crate::fixtures::TemporalFixtures;

/// Builder for a rate table and its rows, producing a snapshot
pub struct RateTableBuilder {
    table: RateTable,
    entries: Vec<RateTableEntry>,
    factors: Vec<RateFactor>,
    riders: Vec<RateRider>,
    fees: Vec<RateFee>,
    modal_factors: Vec<RateModalFactor>,
}

impl RateTableBuilder {
    /// Creates a builder for an active version-1 table effective from the
    /// standard fixture date
    pub fn new(product_type: ProductType) -> Self {
        Self {
            table: RateTable::new(product_type, 1, TemporalFixtures::table_effective()),
            entries: Vec::new(),
            factors: Vec::new(),
            riders: Vec::new(),
            fees: Vec::new(),
            modal_factors: Vec::new(),
        }
    }

    /// Sets the table version
    pub fn with_version(mut self, version: u32) -> Self {
        self.table.version = version;
        self
    }

    /// Assigns the table to a carrier
    pub fn with_carrier(mut self, carrier_id: CarrierId) -> Self {
        self.table.carrier_id = Some(carrier_id);
        self
    }

    /// Sets the effective-from date
    pub fn effective_from(mut self, date: NaiveDate) -> Self {
        self.table.effective.start = date;
        self
    }

    /// Marks the table inactive
    pub fn inactive(mut self) -> Self {
        self.table.is_active = false;
        self
    }

    /// Adds a base-rate entry
    pub fn entry(mut self, rate_key: impl Into<String>, rate_value: Decimal) -> Self {
        self.entries.push(RateTableEntry {
            table_id: self.table.id,
            rate_key: rate_key.into(),
            rate_value,
        });
        self
    }

    /// Adds a factor option row
    pub fn factor(
        mut self,
        factor_code: impl Into<String>,
        option_value: impl Into<String>,
        apply_mode: FactorApplyMode,
        factor_value: Decimal,
        sort_order: i32,
    ) -> Self {
        let factor_code = factor_code.into();
        self.factors.push(RateFactor {
            table_id: self.table.id,
            label: factor_code.clone(),
            factor_code,
            option_value: option_value.into(),
            apply_mode,
            factor_value,
            sort_order,
        });
        self
    }

    /// Adds a rider row
    pub fn rider(
        mut self,
        rider_code: impl Into<String>,
        apply_mode: RiderApplyMode,
        rider_value: Decimal,
        is_default: bool,
        sort_order: i32,
    ) -> Self {
        let rider_code = rider_code.into();
        self.riders.push(RateRider {
            table_id: self.table.id,
            label: rider_code.clone(),
            rider_code,
            apply_mode,
            rider_value,
            is_default,
            sort_order,
        });
        self
    }

    /// Adds a fee or credit row
    pub fn fee(
        mut self,
        fee_code: impl Into<String>,
        fee_type: FeeType,
        apply_mode: FeeApplyMode,
        fee_value: Decimal,
        sort_order: i32,
    ) -> Self {
        let fee_code = fee_code.into();
        self.fees.push(RateFee {
            table_id: self.table.id,
            label: fee_code.clone(),
            fee_code,
            fee_type,
            apply_mode,
            fee_value,
            sort_order,
        });
        self
    }

    /// Adds a modal conversion row
    pub fn modal(mut self, mode: PaymentMode, factor: Decimal, flat_fee: Decimal) -> Self {
        self.modal_factors.push(RateModalFactor {
            table_id: self.table.id,
            mode,
            factor,
            flat_fee,
        });
        self
    }

    /// Builds the snapshot
    pub fn build(self) -> RateDataSnapshot {
        RateDataSnapshot::new(
            self.table,
            self.entries,
            self.factors,
            self.riders,
            self.fees,
            self.modal_factors,
        )
    }
}

/// Builder for rating inputs
pub struct RateInputBuilder {
    input: RateInput,
}

impl RateInputBuilder {
    pub fn new(product_type: ProductType) -> Self {
        Self {
            input: RateInput::new(product_type),
        }
    }

    pub fn age(mut self, age: u32) -> Self {
        self.input.age = Some(age);
        self
    }

    pub fn sex(mut self, sex: impl Into<String>) -> Self {
        self.input.sex = Some(sex.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.input.state = Some(state.into());
        self
    }

    pub fn occupation_class(mut self, class: impl Into<String>) -> Self {
        self.input.occupation_class = Some(class.into());
        self
    }

    pub fn uw_class(mut self, class: impl Into<String>) -> Self {
        self.input.uw_class = Some(class.into());
        self
    }

    pub fn annual_income(mut self, income: Decimal) -> Self {
        self.input.annual_income = Some(income);
        self
    }

    pub fn existing_coverage_monthly(mut self, amount: Decimal) -> Self {
        self.input.existing_coverage_monthly = Some(amount);
        self
    }

    pub fn monthly_benefit_requested(mut self, amount: Decimal) -> Self {
        self.input.monthly_benefit_requested = Some(amount);
        self
    }

    pub fn tobacco_use(mut self, smokes: bool) -> Self {
        self.input.tobacco_use = Some(smokes);
        self
    }

    pub fn payment_mode(mut self, mode: PaymentMode) -> Self {
        self.input.payment_mode = mode;
        self
    }

    pub fn coverage(mut self, coverage: CoverageInput) -> Self {
        self.input.coverages.push(coverage);
        self
    }

    pub fn insured_object(mut self, object: InsuredObject) -> Self {
        self.input.insured_objects.push(object);
        self
    }

    pub fn select_factor(
        mut self,
        factor_code: impl Into<String>,
        option_value: impl Into<String>,
    ) -> Self {
        self.input
            .factor_selections
            .insert(factor_code.into(), option_value.into());
        self
    }

    pub fn select_rider(mut self, rider_code: impl Into<String>, selected: bool) -> Self {
        self.input
            .rider_selections
            .insert(rider_code.into(), selected);
        self
    }

    pub fn build(self) -> RateInput {
        self.input
    }
}
