//! Premium Rating Domain
//!
//! This crate computes insurance premiums for heterogeneous product
//! families (disability, long-term care, life, property & casualty) from a
//! single normalized applicant/exposure description, using versioned,
//! carrier-specific rate data. Results are bit-reproducible and every
//! number that contributed to the final premium appears in the output
//! breakdown.
//!
//! # Architecture
//!
//! ```text
//! RateInput
//!    |
//!    v
//! PluginRegistry ── selects ──> RatingPlugin (per product family)
//!    |                             eligibility, exposure, rate key
//!    v
//! RateStore ── snapshot of the active RateTable and its rows
//!    |
//!    v
//! shared pipeline: base rate -> factors -> riders -> fees -> modal
//!    |
//!    v
//! RateOutput + appended RatingRun audit record
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_rating::{RatingEngine, RateInput, ProductType};
//!
//! let engine = RatingEngine::new(store, recorder);
//! let mut input = RateInput::new(ProductType::Life);
//! input.age = Some(40);
//! // ...
//! let output = engine.rate(&input)?;
//! if output.eligible {
//!     println!("annual premium: {}", output.premium_annual);
//! }
//! ```

pub mod engine;
pub mod error;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod plugin;
pub mod plugins;
pub mod rate_key;
pub mod recorder;
pub mod registry;
pub mod store;
pub mod tables;

pub use engine::{RatingEngine, ENGINE_VERSION};
pub use error::RatingError;
pub use input::{CoverageInput, InsuredObject, PaymentMode, ProductType, RateInput, Sex};
pub use output::{AppliedFactor, AppliedFee, AppliedRider, RateOutput};
pub use plugin::{Ineligibility, RatingPlugin};
pub use plugins::{DisabilityPlugin, LifePlugin, PropertyCasualtyPlugin};
pub use rate_key::{RateKey, WILDCARD};
pub use recorder::{InMemoryRunRecorder, RatingRun, RunRecorder, RunStatus};
pub use registry::PluginRegistry;
pub use store::{InMemoryRateStore, RateDataSnapshot, RateStore, StoreError};
pub use tables::{
    FactorApplyMode, FeeApplyMode, FeeType, RateFactor, RateFee, RateModalFactor, RateRider,
    RateTable, RateTableEntry, RiderApplyMode,
};
