//! Configuration types for season catalogs.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::calculation::DEFAULT_CURRENCY_DECIMALS;
use crate::models::Product;

/// Metadata about the season, read from `season.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SeasonMetadata {
    /// Short code identifying the season (e.g., "vegetable-share-2025").
    pub code: String,
    /// The human-readable name of the season.
    pub name: String,
    /// Length of the season in months.
    pub season_months: u32,
    /// Number of decimals at which charges must balance delivered value.
    #[serde(default = "default_currency_decimals")]
    pub currency_decimals: u32,
}

fn default_currency_decimals() -> u32 {
    DEFAULT_CURRENCY_DECIMALS
}

/// A product as written in `products.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductEntry {
    /// The human-readable name of the product.
    pub name: String,
    /// Price of one unit for one delivery.
    pub base_price_per_unit: Decimal,
    /// Number of deliveries per season cycle.
    pub frequency: Decimal,
}

/// Products configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductsConfig {
    /// Map of product id to product details.
    pub products: HashMap<String, ProductEntry>,
}

/// The complete season configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct SeasonConfig {
    metadata: SeasonMetadata,
    products: HashMap<String, Arc<Product>>,
}

impl SeasonConfig {
    /// Creates a new SeasonConfig from its component parts.
    ///
    /// Each product entry becomes one shared [`Product`] keyed by its id.
    pub fn new(metadata: SeasonMetadata, products: HashMap<String, ProductEntry>) -> Self {
        let products = products
            .into_iter()
            .map(|(id, entry)| {
                let product = Product {
                    id: id.clone(),
                    name: entry.name,
                    base_price_per_unit: entry.base_price_per_unit,
                    frequency: entry.frequency,
                };
                (id, Arc::new(product))
            })
            .collect();
        Self { metadata, products }
    }

    /// Returns the season metadata.
    pub fn season(&self) -> &SeasonMetadata {
        &self.metadata
    }

    /// Returns all products keyed by id.
    pub fn products(&self) -> &HashMap<String, Arc<Product>> {
        &self.products
    }
}
