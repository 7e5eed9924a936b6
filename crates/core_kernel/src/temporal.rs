//! Effective-window temporal handling
//!
//! Versioned rate data is date-effective: each table carries the window of
//! business dates during which it may be used for rating. Windows have an
//! inclusive start and an exclusive, optionally unbounded end.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid window: start {start} must be before end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },
}

/// A business-effective date window
///
/// Used to track when a rate table may be used for rating. For example, a
/// table version might be effective from 2025-01-01 until superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveWindow {
    /// Start of the window (inclusive)
    pub start: NaiveDate,
    /// End of the window (exclusive), None means unbounded
    pub end: Option<NaiveDate>,
}

impl EffectiveWindow {
    /// Creates a new effective window
    ///
    /// # Errors
    ///
    /// Returns an error if the start is not strictly before the end.
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Result<Self, TemporalError> {
        if let Some(end) = end {
            if start >= end {
                return Err(TemporalError::InvalidWindow { start, end });
            }
        }
        Ok(Self { start, end })
    }

    /// Creates an unbounded window starting at the given date
    pub fn from(start: NaiveDate) -> Self {
        Self { start, end: None }
    }

    /// Returns true if the window contains the given date
    pub fn contains(&self, date: NaiveDate) -> bool {
        if date < self.start {
            return false;
        }
        match self.end {
            Some(end) => date < end,
            None => true,
        }
    }
}
