//! Rating domain errors
//!
//! Only system failures live here: data-store problems, malformed rate
//! data, and programming errors such as an unregistered product type.
//! Business ineligibility is never an error - it is a normal outcome
//! carried as `eligible = false` on [`crate::output::RateOutput`].

use thiserror::Error;

use core_kernel::CanonicalError;

use crate::input::ProductType;
use crate::store::StoreError;

/// System failures raised by the rating engine
#[derive(Debug, Error)]
pub enum RatingError {
    /// No plugin claims the product type - a configuration defect
    #[error("No rating plugin registered for product type: {0}")]
    UnregisteredProduct(ProductType),

    /// The rate store failed or returned malformed data
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The audit record could not be serialized
    #[error("Audit serialization failed: {0}")]
    Audit(#[from] CanonicalError),

    /// The reproducibility record could not be appended
    #[error("Failed to record rating run: {0}")]
    Recorder(#[source] StoreError),
}
