//! Composite rate-key construction
//!
//! A rate key identifies one base-rate row: ASCII segments joined by `|`,
//! in a fixed per-plugin order, with `*` as the wildcard segment. Fallback
//! chains are derived by wildcarding specific positions of the exact key.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The wildcard segment marker
pub const WILDCARD: &str = "*";

/// A pipe-delimited composite lookup key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RateKey {
    segments: Vec<String>,
}

impl RateKey {
    /// Builds a key from owned segments
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Builds a key from string slices
    pub fn from_parts(parts: &[&str]) -> Self {
        Self {
            segments: parts.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Returns the number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if the key has no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns a copy with the given positions replaced by `*`
    ///
    /// Out-of-range positions are ignored.
    pub fn with_wildcards(&self, positions: &[usize]) -> Self {
        let mut segments = self.segments.clone();
        for &pos in positions {
            if pos < segments.len() {
                segments[pos] = WILDCARD.to_string();
            }
        }
        Self { segments }
    }

    /// Returns true if every segment is the wildcard
    pub fn is_fully_wildcarded(&self) -> bool {
        !self.segments.is_empty() && self.segments.iter().all(|s| s == WILDCARD)
    }
}

impl fmt::Display for RateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("|"))
    }
}
