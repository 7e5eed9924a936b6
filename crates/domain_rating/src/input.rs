//! Rating input value objects
//!
//! `RateInput` is the single normalized applicant/exposure description that
//! crosses the pipeline boundary. All product families consume the same
//! shape; each plugin reads the fields relevant to its products and ignores
//! the rest. Map-shaped fields are BTreeMaps so the canonical serialization
//! used for audit hashing is deterministic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use core_kernel::CarrierId;

/// The closed set of rateable product types
///
/// Each rating plugin declares which of these it owns; registration is
/// checked for injectivity when the plugin registry is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    Disability,
    LongTermCare,
    Life,
    Auto,
    Motorcycle,
    Boat,
    Rv,
    Homeowners,
    Renters,
    Condo,
    GeneralLiability,
    Umbrella,
    WorkersComp,
}

impl ProductType {
    /// Returns the canonical string form of this product type
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Disability => "disability",
            ProductType::LongTermCare => "long_term_care",
            ProductType::Life => "life",
            ProductType::Auto => "auto",
            ProductType::Motorcycle => "motorcycle",
            ProductType::Boat => "boat",
            ProductType::Rv => "rv",
            ProductType::Homeowners => "homeowners",
            ProductType::Renters => "renters",
            ProductType::Condo => "condo",
            ProductType::GeneralLiability => "general_liability",
            ProductType::Umbrella => "umbrella",
            ProductType::WorkersComp => "workers_comp",
        }
    }

    /// Returns true for lines rated by vehicle count
    pub fn is_vehicle_line(&self) -> bool {
        matches!(
            self,
            ProductType::Auto | ProductType::Motorcycle | ProductType::Boat | ProductType::Rv
        )
    }

    /// Returns true for lines rated by insured property value
    pub fn is_property_line(&self) -> bool {
        matches!(
            self,
            ProductType::Homeowners | ProductType::Renters | ProductType::Condo
        )
    }

    /// Returns true for lines rated by aggregate liability limit
    pub fn is_liability_line(&self) -> bool {
        matches!(self, ProductType::GeneralLiability | ProductType::Umbrella)
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disability" => Ok(ProductType::Disability),
            "long_term_care" => Ok(ProductType::LongTermCare),
            "life" => Ok(ProductType::Life),
            "auto" => Ok(ProductType::Auto),
            "motorcycle" => Ok(ProductType::Motorcycle),
            "boat" => Ok(ProductType::Boat),
            "rv" => Ok(ProductType::Rv),
            "homeowners" => Ok(ProductType::Homeowners),
            "renters" => Ok(ProductType::Renters),
            "condo" => Ok(ProductType::Condo),
            "general_liability" => Ok(ProductType::GeneralLiability),
            "umbrella" => Ok(ProductType::Umbrella),
            "workers_comp" => Ok(ProductType::WorkersComp),
            other => Err(format!("unknown product type: {other}")),
        }
    }
}

/// Normalized applicant sex
///
/// Rate keys use a single uppercase letter. Input accepts the common
/// spellings case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Parses a raw input value, accepting "m", "male", "f", "female"
    /// in any casing
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Some(Sex::Male),
            "f" | "female" => Some(Sex::Female),
            _ => None,
        }
    }

    /// Returns the single-letter rate-key segment
    pub fn key_segment(&self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
        }
    }
}

/// Premium payment mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    #[default]
    Annual,
    SemiAnnual,
    Quarterly,
    Monthly,
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentMode::Annual => "annual",
            PaymentMode::SemiAnnual => "semiannual",
            PaymentMode::Quarterly => "quarterly",
            PaymentMode::Monthly => "monthly",
        };
        write!(f, "{s}")
    }
}

/// A requested coverage component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageInput {
    /// Coverage type, e.g. "death_benefit", "long_term_care"
    pub coverage_type: Option<String>,
    /// Coverage category grouping
    pub coverage_category: Option<String>,
    /// Benefit amount (lump sum or per-period, product dependent)
    pub benefit_amount: Option<Decimal>,
    /// Per-occurrence limit
    pub limit_amount: Option<Decimal>,
    /// Aggregate limit across occurrences
    pub aggregate_limit: Option<Decimal>,
}

/// An insured object for property & casualty lines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsuredObject {
    /// Object type, e.g. "vehicle", "dwelling", "business"
    pub object_type: Option<String>,
    /// Model year for vehicle objects
    pub vehicle_year: Option<i32>,
    /// Construction type for property objects
    pub construction_type: Option<String>,
    /// Insured value for property objects
    pub insured_value: Option<Decimal>,
    /// Annual revenue or payroll proxy for commercial objects
    pub annual_revenue: Option<Decimal>,
}

impl InsuredObject {
    /// Returns true if this object rates as a vehicle
    pub fn is_vehicle(&self) -> bool {
        if self.vehicle_year.is_some() {
            return true;
        }
        match &self.object_type {
            Some(t) => matches!(
                t.to_ascii_lowercase().as_str(),
                "vehicle" | "auto" | "car" | "truck" | "motorcycle" | "boat" | "rv"
            ),
            None => false,
        }
    }
}

/// The normalized rating request
///
/// One `RateInput` describes one applicant/exposure for one product type.
/// Optional fields are product specific; each plugin's eligibility stage
/// verifies the fields it requires before any numeric work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateInput {
    /// Product type being rated
    pub product_type: ProductType,
    /// Requested rate-table version; None selects the active version
    pub rate_table_version: Option<u32>,
    /// Carrier whose rate data should be used; None selects
    /// carrier-agnostic tables
    pub carrier_id: Option<CarrierId>,
    /// Applicant age in years
    pub age: Option<u32>,
    /// Applicant sex, raw; normalized via [`Sex::parse`]
    pub sex: Option<String>,
    /// Two-letter state code
    pub state: Option<String>,
    /// Requested coverages
    pub coverages: Vec<CoverageInput>,
    /// Insured objects (P&C lines)
    pub insured_objects: Vec<InsuredObject>,
    /// Explicit factor selections: factor_code -> option_value
    pub factor_selections: BTreeMap<String, String>,
    /// Explicit rider selections: rider_code -> selected
    pub rider_selections: BTreeMap<String, bool>,
    /// Occupation class code (DI)
    pub occupation_class: Option<String>,
    /// Underwriting class code
    pub uw_class: Option<String>,
    /// Tobacco use flag
    pub tobacco_use: Option<bool>,
    /// Height in inches
    pub height_inches: Option<Decimal>,
    /// Weight in pounds
    pub weight_lbs: Option<Decimal>,
    /// Annual income (DI)
    pub annual_income: Option<Decimal>,
    /// Existing monthly disability coverage to offset (DI)
    pub existing_coverage_monthly: Option<Decimal>,
    /// Requested monthly benefit (DI)
    pub monthly_benefit_requested: Option<Decimal>,
    /// Annual payroll (workers comp)
    pub annual_payroll: Option<Decimal>,
    /// Elimination period in days (DI/LTC)
    pub elimination_period_days: Option<u32>,
    /// Benefit period code, e.g. "to_age_65"
    pub benefit_period: Option<String>,
    /// Definition of disability, e.g. "own_occupation"
    pub definition_of_disability: Option<String>,
    /// Requested payment mode
    pub payment_mode: PaymentMode,
    /// Escape hatch for product-specific extras
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl RateInput {
    /// Creates an empty input for the given product type
    pub fn new(product_type: ProductType) -> Self {
        Self {
            product_type,
            rate_table_version: None,
            carrier_id: None,
            age: None,
            sex: None,
            state: None,
            coverages: Vec::new(),
            insured_objects: Vec::new(),
            factor_selections: BTreeMap::new(),
            rider_selections: BTreeMap::new(),
            occupation_class: None,
            uw_class: None,
            tobacco_use: None,
            height_inches: None,
            weight_lbs: None,
            annual_income: None,
            existing_coverage_monthly: None,
            monthly_benefit_requested: None,
            annual_payroll: None,
            elimination_period_days: None,
            benefit_period: None,
            definition_of_disability: None,
            payment_mode: PaymentMode::Annual,
            metadata: BTreeMap::new(),
        }
    }

    /// Returns the normalized sex, if present and parseable
    pub fn normalized_sex(&self) -> Option<Sex> {
        self.sex.as_deref().and_then(Sex::parse)
    }

    /// Returns the uppercased state code, if present
    pub fn normalized_state(&self) -> Option<String> {
        self.state
            .as_deref()
            .map(|s| s.trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty())
    }
}
