//! Rating run recorder
//!
//! Every rating invocation appends exactly one immutable `RatingRun`: the
//! SHA-256 hash of the canonical input, full input and output snapshots,
//! the terminal status, and the wall-clock duration. Runs are never mutated
//! or deleted; together with the rate-table version they make any premium
//! bit-reproducible after the fact.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use core_kernel::RatingRunId;

use crate::input::ProductType;
use crate::store::StoreError;

/// Terminal status of a rating run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Rated to completion with a full breakdown
    Completed,
    /// Business ineligibility; reason recorded on the output snapshot
    Ineligible,
    /// System failure; message recorded, no output snapshot
    Error,
}

/// Immutable audit record of one rating invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRun {
    pub id: RatingRunId,
    pub product_type: ProductType,
    /// Version of the rate table used, when one was resolved
    pub rate_table_version: Option<u32>,
    pub engine_version: String,
    /// SHA-256 hex digest of the canonical input serialization
    pub input_hash: String,
    pub input_snapshot: serde_json::Value,
    /// Absent when the run failed before producing an output
    pub output_snapshot: Option<serde_json::Value>,
    pub premium_annual: Option<Decimal>,
    pub premium_modal: Option<Decimal>,
    pub status: RunStatus,
    pub error_message: Option<String>,
    pub duration_ms: u64,
    pub created_at: DateTime<Utc>,
}

/// Append-only port for rating runs
///
/// Each run is independent and immutable once created, so implementations
/// need no coordination between concurrent rating calls.
pub trait RunRecorder: Send + Sync {
    fn record(&self, run: RatingRun) -> Result<(), StoreError>;
}

/// In-memory run recorder
///
/// Reference adapter used by tests and embedders that forward runs
/// elsewhere.
#[derive(Debug, Default)]
pub struct InMemoryRunRecorder {
    runs: Mutex<Vec<RatingRun>>,
}

impl InMemoryRunRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all recorded runs in append order
    pub fn runs(&self) -> Vec<RatingRun> {
        self.runs.lock().expect("run recorder poisoned").clone()
    }

    /// Number of recorded runs
    pub fn len(&self) -> usize {
        self.runs.lock().expect("run recorder poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RunRecorder for InMemoryRunRecorder {
    fn record(&self, run: RatingRun) -> Result<(), StoreError> {
        self.runs
            .lock()
            .map_err(|_| StoreError::unavailable("run recorder poisoned"))?
            .push(run);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_run(status: RunStatus) -> RatingRun {
        RatingRun {
            id: RatingRunId::new(),
            product_type: ProductType::Life,
            rate_table_version: Some(1),
            engine_version: "0.1.0".to_string(),
            input_hash: "ab".repeat(32),
            input_snapshot: serde_json::json!({}),
            output_snapshot: None,
            premium_annual: None,
            premium_modal: None,
            status,
            error_message: None,
            duration_ms: 3,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_recorder_appends_in_order() {
        let recorder = InMemoryRunRecorder::new();
        recorder.record(sample_run(RunStatus::Completed)).unwrap();
        recorder.record(sample_run(RunStatus::Ineligible)).unwrap();

        let runs = recorder.runs();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].status, RunStatus::Completed);
        assert_eq!(runs[1].status, RunStatus::Ineligible);
    }

    #[test]
    fn test_status_serde_spelling() {
        assert_eq!(
            serde_json::to_string(&RunStatus::Ineligible).unwrap(),
            "\"ineligible\""
        );
    }
}
