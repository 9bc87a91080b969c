//! Request types describing season chains.
//!
//! An external ordering system records every subscription change as a season
//! part naming a catalog product by id. These types decode such records from
//! JSON or YAML and resolve them into chains of [`SeasonPart`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{SeasonLine, SeasonPart};

/// A whole season order with one chain per product line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonRequest {
    /// The season code the order belongs to; must match the loaded catalog.
    pub season_code: String,
    /// One chain per product line.
    pub lines: Vec<ChainRequest>,
}

/// The chain of changes for one product line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainRequest {
    /// Identifier of the line.
    pub line_id: String,
    /// Season parts in chronological order.
    pub parts: Vec<SeasonPartRequest>,
}

/// One season part in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonPartRequest {
    /// Catalog id of the ordered product.
    pub product_id: String,
    /// Number of units ordered.
    pub quantity: Decimal,
    /// Months from this part's start until the end of the season.
    pub months_remaining: u32,
    /// Fraction (0..=1) of the season's value not yet delivered.
    pub weight_remaining: Decimal,
}

impl SeasonRequest {
    /// Decodes a season request from JSON.
    pub fn from_json(input: &str) -> EngineResult<Self> {
        serde_json::from_str(input).map_err(|e| EngineError::RequestParseError {
            message: e.to_string(),
        })
    }

    /// Decodes a season request from YAML.
    pub fn from_yaml(input: &str) -> EngineResult<Self> {
        serde_yaml::from_str(input).map_err(|e| EngineError::RequestParseError {
            message: e.to_string(),
        })
    }

    /// Resolves every line against the catalog.
    ///
    /// # Returns
    ///
    /// The season lines, or an error if the season code does not match the
    /// catalog or a product id is unknown.
    pub fn into_lines(self, catalog: &ConfigLoader) -> EngineResult<Vec<SeasonLine>> {
        let expected = &catalog.season().code;
        if &self.season_code != expected {
            return Err(EngineError::RequestParseError {
                message: format!(
                    "request is for season '{}' but the catalog is '{}'",
                    self.season_code, expected
                ),
            });
        }

        self.lines
            .into_iter()
            .map(|line| {
                let line_id = line.line_id.clone();
                let chain = line.into_chain(catalog)?;
                Ok(SeasonLine { line_id, chain })
            })
            .collect()
    }
}

impl ChainRequest {
    /// Decodes a chain request from JSON.
    pub fn from_json(input: &str) -> EngineResult<Self> {
        serde_json::from_str(input).map_err(|e| EngineError::RequestParseError {
            message: e.to_string(),
        })
    }

    /// Decodes a chain request from YAML.
    pub fn from_yaml(input: &str) -> EngineResult<Self> {
        serde_yaml::from_str(input).map_err(|e| EngineError::RequestParseError {
            message: e.to_string(),
        })
    }

    /// Resolves product ids into shared catalog products.
    ///
    /// Parts naming the same product share one `Arc<Product>`. The first part
    /// must span the catalog's `season_months`; the rest of the chain is
    /// validated when it is prorated.
    pub fn into_chain(self, catalog: &ConfigLoader) -> EngineResult<Vec<SeasonPart>> {
        let season_months = catalog.season().season_months;
        if let Some(head) = self.parts.first() {
            if head.months_remaining != season_months {
                return Err(EngineError::InvalidSeasonPart {
                    part_index: 0,
                    field: "months_remaining".to_string(),
                    message: format!(
                        "line '{}' starts with {} months but season '{}' has {}",
                        self.line_id,
                        head.months_remaining,
                        catalog.season().code,
                        season_months
                    ),
                });
            }
        }

        self.parts
            .into_iter()
            .map(|part| {
                let product = catalog.get_product(&part.product_id)?;
                Ok(SeasonPart::new(
                    product,
                    part.quantity,
                    part.months_remaining,
                    part.weight_remaining,
                ))
            })
            .collect()
    }
}
