//! The rating engine
//!
//! Orchestrates one rating call: dispatch to the owning plugin, eligibility,
//! snapshot fetch, exposure normalization, base-rate resolution with
//! fallback, then the shared factor/rider/fee/modal pipeline. The call is
//! stateless and synchronous; the only write is the append-only rating run.

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use core_kernel::canonical::hash_canonical;
use core_kernel::rounding::round_currency;
use core_kernel::RatingRunId;

use crate::error::RatingError;
use crate::input::RateInput;
use crate::output::RateOutput;
use crate::pipeline::{
    apply_factors, apply_fees, apply_modal, apply_riders, resolve_base_rate,
};
use crate::recorder::{RatingRun, RunRecorder, RunStatus};
use crate::registry::PluginRegistry;
use crate::store::RateStore;

/// Version stamped on every output and audit record
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The premium rating engine
///
/// Holds no mutable state; concurrent calls may share one engine freely.
pub struct RatingEngine {
    registry: PluginRegistry,
    store: Arc<dyn RateStore>,
    recorder: Arc<dyn RunRecorder>,
}

impl RatingEngine {
    /// Creates an engine with the standard plugin registry
    pub fn new(store: Arc<dyn RateStore>, recorder: Arc<dyn RunRecorder>) -> Self {
        Self::with_registry(PluginRegistry::standard(), store, recorder)
    }

    /// Creates an engine with a custom registry
    pub fn with_registry(
        registry: PluginRegistry,
        store: Arc<dyn RateStore>,
        recorder: Arc<dyn RunRecorder>,
    ) -> Self {
        Self {
            registry,
            store,
            recorder,
        }
    }

    /// Rates an input as of today
    pub fn rate(&self, input: &RateInput) -> Result<RateOutput, RatingError> {
        self.rate_as_of(input, Utc::now().date_naive())
    }

    /// Rates an input against the tables active on a specific date
    ///
    /// Every invocation appends exactly one rating run, whatever the
    /// outcome. A recorder failure on an otherwise successful call is a
    /// system failure: the audit trail is not optional.
    pub fn rate_as_of(
        &self,
        input: &RateInput,
        as_of: NaiveDate,
    ) -> Result<RateOutput, RatingError> {
        let started = Instant::now();
        let result = self.rate_inner(input, as_of);
        let duration_ms = started.elapsed().as_millis() as u64;

        let input_hash = hash_canonical(input)?;
        let input_snapshot = serde_json::to_value(input)
            .map_err(core_kernel::CanonicalError::Serialization)?;

        let run = match &result {
            Ok(output) => {
                let status = if output.eligible {
                    RunStatus::Completed
                } else {
                    RunStatus::Ineligible
                };
                RatingRun {
                    id: RatingRunId::new_v7(),
                    product_type: input.product_type,
                    rate_table_version: output.rate_table_version,
                    engine_version: ENGINE_VERSION.to_string(),
                    input_hash,
                    input_snapshot,
                    output_snapshot: Some(
                        serde_json::to_value(output)
                            .map_err(core_kernel::CanonicalError::Serialization)?,
                    ),
                    premium_annual: output.eligible.then_some(output.premium_annual),
                    premium_modal: output.eligible.then_some(output.premium_modal),
                    status,
                    error_message: None,
                    duration_ms,
                    created_at: Utc::now(),
                }
            }
            Err(error) => RatingRun {
                id: RatingRunId::new_v7(),
                product_type: input.product_type,
                rate_table_version: None,
                engine_version: ENGINE_VERSION.to_string(),
                input_hash,
                input_snapshot,
                output_snapshot: None,
                premium_annual: None,
                premium_modal: None,
                status: RunStatus::Error,
                error_message: Some(error.to_string()),
                duration_ms,
                created_at: Utc::now(),
            },
        };

        let run_id = run.id;
        let status = run.status;
        match self.recorder.record(run) {
            Ok(()) => {
                info!(%run_id, ?status, duration_ms, "rating run recorded");
            }
            Err(record_error) => {
                if result.is_err() {
                    // Keep the original failure; the lost record is logged
                    warn!(%run_id, %record_error, "failed to record errored rating run");
                } else {
                    return Err(RatingError::Recorder(record_error));
                }
            }
        }

        result
    }

    fn rate_inner(&self, input: &RateInput, as_of: NaiveDate) -> Result<RateOutput, RatingError> {
        let plugin = self.registry.plugin_for(input.product_type)?;
        debug!(product_type = %input.product_type, plugin = plugin.name(), "dispatching rating call");

        if let Err(ineligibility) = plugin.check_eligibility(input) {
            debug!(reason = %ineligibility, "eligibility check failed");
            return Ok(RateOutput::ineligible(
                ENGINE_VERSION,
                None,
                ineligibility.reason,
            ));
        }

        let snapshot = self.store.active_snapshot(
            input.product_type,
            input.rate_table_version,
            input.carrier_id,
            as_of,
        )?;
        let Some(snapshot) = snapshot else {
            return Ok(RateOutput::ineligible(
                ENGINE_VERSION,
                None,
                format!(
                    "no active rate table for product type {}",
                    input.product_type
                ),
            ));
        };
        let table_version = snapshot.table.version;

        let exposure = match plugin.exposure(input) {
            Ok(exposure) => exposure,
            Err(ineligibility) => {
                debug!(reason = %ineligibility, "exposure normalization failed");
                return Ok(RateOutput::ineligible(
                    ENGINE_VERSION,
                    Some(table_version),
                    ineligibility.reason,
                ));
            }
        };

        let exact_key = plugin.base_rate_key(input, as_of);
        let mut candidates = vec![exact_key.clone()];
        candidates.extend(plugin.fallback_keys(&exact_key));

        let Some(resolved) = resolve_base_rate(&snapshot, &candidates) else {
            let last_attempted = candidates
                .last()
                .map(|k| k.to_string())
                .unwrap_or_default();
            return Ok(RateOutput::ineligible(
                ENGINE_VERSION,
                Some(table_version),
                format!("no base rate found for key {last_attempted}"),
            ));
        };

        let base_premium = resolved.rate_value * exposure;
        let factors = apply_factors(&snapshot, input, plugin, base_premium);
        let riders = apply_riders(&snapshot, input, exposure, factors.premium);
        let fees = apply_fees(&snapshot, riders.premium);
        let modal = apply_modal(&snapshot, input.payment_mode, fees.premium);

        Ok(RateOutput {
            eligible: true,
            ineligible_reason: None,
            engine_version: ENGINE_VERSION.to_string(),
            rate_table_version: Some(table_version),
            exposure,
            base_rate_key: Some(resolved.rate_key),
            base_rate_value: Some(resolved.rate_value),
            base_premium: round_currency(base_premium),
            premium_factored: round_currency(factors.premium),
            factors_applied: factors.applied,
            premium_with_riders: round_currency(riders.premium),
            riders_applied: riders.applied,
            premium_annual: round_currency(fees.premium),
            fees_applied: fees.applied,
            premium_modal: modal.premium_modal,
            modal_mode: input.payment_mode,
            modal_factor: modal.factor,
            modal_fee: modal.flat_fee,
        })
    }
}
