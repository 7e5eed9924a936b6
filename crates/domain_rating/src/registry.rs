//! Plugin registry and dispatch
//!
//! Maps each product type to the plugin that owns it. Registration is
//! injective: two plugins claiming the same product type is a startup-time
//! configuration error, never a runtime rating error.

use std::collections::HashMap;
use std::sync::Arc;

use core_kernel::CoreError;

use crate::error::RatingError;
use crate::input::ProductType;
use crate::plugin::RatingPlugin;
use crate::plugins::{DisabilityPlugin, LifePlugin, PropertyCasualtyPlugin};

/// Registry of product-family plugins
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn RatingPlugin>>,
    by_type: HashMap<ProductType, usize>,
}

impl PluginRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the standard registry with all three product plugins
    pub fn standard() -> Self {
        let mut registry = Self::new();
        let plugins: [Arc<dyn RatingPlugin>; 3] = [
            Arc::new(DisabilityPlugin::new()),
            Arc::new(LifePlugin::new()),
            Arc::new(PropertyCasualtyPlugin::new()),
        ];
        for plugin in plugins {
            registry
                .register(plugin)
                .expect("standard plugins claim disjoint product types");
        }
        registry
    }

    /// Registers a plugin for every product type it declares
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any declared type is already
    /// claimed; a failed registration leaves no partial claims.
    pub fn register(&mut self, plugin: Arc<dyn RatingPlugin>) -> Result<(), CoreError> {
        for product_type in plugin.product_types() {
            if self.by_type.contains_key(product_type) {
                return Err(CoreError::configuration(format!(
                    "product type {product_type} is already claimed by another rating plugin"
                )));
            }
        }

        let index = self.plugins.len();
        for product_type in plugin.product_types() {
            self.by_type.insert(*product_type, index);
        }
        self.plugins.push(plugin);
        Ok(())
    }

    /// Resolves the plugin owning a product type
    pub fn plugin_for(&self, product_type: ProductType) -> Result<&dyn RatingPlugin, RatingError> {
        self.by_type
            .get(&product_type)
            .map(|&index| self.plugins[index].as_ref())
            .ok_or(RatingError::UnregisteredProduct(product_type))
    }
}
