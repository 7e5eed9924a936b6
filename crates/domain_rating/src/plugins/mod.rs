//! Product-family plugins
//!
//! Each plugin supplies eligibility rules, exposure normalization, and
//! rate-key construction for the product types it owns, then delegates to
//! the shared pipeline stages.

mod disability;
mod life;
mod property_casualty;

pub use disability::DisabilityPlugin;
pub use life::LifePlugin;
pub use property_casualty::PropertyCasualtyPlugin;
