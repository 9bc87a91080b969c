//! Product model.
//!
//! This module defines the [`Product`] type: one line item of a subscription
//! season, priced per unit and delivery.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a product that can be ordered for a season.
///
/// A product is immutable once created and is shared between all season
/// parts of the same line through an `Arc`.
///
/// # Example
///
/// ```
/// use season_proration::models::Product;
/// use rust_decimal::Decimal;
///
/// let product = Product {
///     id: "vegetable_share".to_string(),
///     name: "Vegetable share".to_string(),
///     base_price_per_unit: Decimal::from(100),
///     frequency: Decimal::from(12),
/// };
/// assert_eq!(product.total_value(Decimal::from(2)), Some(Decimal::from(2400)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier of the product.
    pub id: String,
    /// Human-readable name of the product.
    pub name: String,
    /// Price of one unit for one delivery.
    pub base_price_per_unit: Decimal,
    /// Number of deliveries per season cycle.
    pub frequency: Decimal,
}

impl Product {
    /// Returns the value of `quantity` units delivered over the full season.
    ///
    /// Returns `None` if the product overflows `Decimal`.
    pub fn total_value(&self, quantity: Decimal) -> Option<Decimal> {
        self.base_price_per_unit
            .checked_mul(self.frequency)?
            .checked_mul(quantity)
    }
}
