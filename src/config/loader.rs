//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading season
//! catalogs from YAML files.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::Product;

use super::types::{ProductsConfig, SeasonConfig, SeasonMetadata};

/// Loads and provides access to a season catalog.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/vegetable-share-2025/
/// ├── season.yaml     # Season metadata
/// └── products.yaml   # Products offered in the season
/// ```
///
/// # Example
///
/// ```no_run
/// use season_proration::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/vegetable-share-2025").unwrap();
///
/// let product = loader.get_product("vegetable_share").unwrap();
/// println!("{}: {} per delivery", product.name, product.base_price_per_unit);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: SeasonConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The season has zero months
    /// - Any product has a non-positive price or frequency
    ///
    /// # Example
    ///
    /// ```no_run
    /// use season_proration::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/vegetable-share-2025")?;
    /// # Ok::<(), season_proration::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let season_path = path.join("season.yaml");
        let metadata = Self::load_yaml::<SeasonMetadata>(&season_path)?;
        if metadata.season_months == 0 {
            return Err(EngineError::ConfigParseError {
                path: season_path.display().to_string(),
                message: "season_months must be at least 1".to_string(),
            });
        }

        let products_path = path.join("products.yaml");
        let products_config = Self::load_yaml::<ProductsConfig>(&products_path)?;

        for (id, entry) in &products_config.products {
            for (field, value) in [
                ("base_price_per_unit", entry.base_price_per_unit),
                ("frequency", entry.frequency),
            ] {
                if value <= Decimal::ZERO {
                    return Err(EngineError::ConfigParseError {
                        path: products_path.display().to_string(),
                        message: format!("product '{}': {} must be positive, got {}", id, field, value),
                    });
                }
            }
        }

        let config = SeasonConfig::new(metadata, products_config.products);
        debug!(
            season = %config.season().code,
            products = config.products().len(),
            "Season catalog loaded"
        );

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        debug!(path = %path_str, "Loading configuration file");
        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying season configuration.
    pub fn config(&self) -> &SeasonConfig {
        &self.config
    }

    /// Returns the season metadata.
    pub fn season(&self) -> &SeasonMetadata {
        self.config.season()
    }

    /// Returns the number of decimals charges must balance at.
    pub fn currency_decimals(&self) -> u32 {
        self.config.season().currency_decimals
    }

    /// Gets a shared product by its id.
    ///
    /// Every call for the same id returns the same `Arc`, so parts built from
    /// the catalog share one product.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use season_proration::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/vegetable-share-2025")?;
    /// let product = loader.get_product("eggs")?;
    /// println!("Eggs: {} deliveries", product.frequency);
    /// # Ok::<(), season_proration::error::EngineError>(())
    /// ```
    pub fn get_product(&self, id: &str) -> EngineResult<Arc<Product>> {
        self.config
            .products()
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::ProductNotFound { id: id.to_string() })
    }
}
