//! Core Kernel - Foundational types and utilities for the rating system
//!
//! This crate provides the fundamental building blocks used across the
//! rating domain:
//! - Strongly-typed identifiers for rate tables, carriers, and rating runs
//! - Rounding policies for recorded monetary amounts
//! - Effective-window temporal handling for versioned rate data
//! - Canonical serialization and hashing for reproducibility records

pub mod canonical;
pub mod error;
pub mod identifiers;
pub mod rounding;
pub mod temporal;

pub use canonical::{canonical_json, sha256_hex, CanonicalError};
pub use error::CoreError;
pub use identifiers::{CarrierId, RateTableId, RatingRunId};
pub use rounding::{floor_at_zero, round_bankers, round_currency};
pub use temporal::{EffectiveWindow, TemporalError};
