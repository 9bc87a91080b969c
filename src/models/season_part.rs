//! Season part model.
//!
//! A [`SeasonPart`] is one state of a subscription, valid from the change that
//! created it until the next change or the end of the season.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Product;

/// One segment of a season's lifetime.
///
/// `months_remaining` and `weight_remaining` are both measured at the moment
/// the part became effective. Along a chain neither value may increase.
///
/// # Example
///
/// ```
/// use season_proration::models::{Product, SeasonPart};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
/// use std::sync::Arc;
///
/// let product = Arc::new(Product {
///     id: "vegetable_share".to_string(),
///     name: "Vegetable share".to_string(),
///     base_price_per_unit: Decimal::from(100),
///     frequency: Decimal::from(12),
/// });
/// let part = SeasonPart::new(product, Decimal::ONE, 6, Decimal::from_str("0.7").unwrap());
/// assert_eq!(part.remaining_value(), Some(Decimal::from(840)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonPart {
    /// The ordered product, shared with the other parts of the same line.
    pub product: Arc<Product>,
    /// Number of units ordered while this part is in effect.
    pub quantity: Decimal,
    /// Months from this part's start until the end of the season.
    pub months_remaining: u32,
    /// Fraction (0..=1) of the season's value not yet delivered.
    pub weight_remaining: Decimal,
}

impl SeasonPart {
    /// Creates a new season part.
    pub fn new(
        product: Arc<Product>,
        quantity: Decimal,
        months_remaining: u32,
        weight_remaining: Decimal,
    ) -> Self {
        Self {
            product,
            quantity,
            months_remaining,
            weight_remaining,
        }
    }

    /// Value of this part's order if it were delivered for the whole season.
    ///
    /// `None` on `Decimal` overflow.
    pub fn total_value(&self) -> Option<Decimal> {
        self.product.total_value(self.quantity)
    }

    /// Value still to be delivered under this part's terms.
    pub fn remaining_value(&self) -> Option<Decimal> {
        self.total_value()?.checked_mul(self.weight_remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_product() -> Arc<Product> {
        Arc::new(Product {
            id: "vegetable_share".to_string(),
            name: "Vegetable share".to_string(),
            base_price_per_unit: dec("100"),
            frequency: dec("12"),
        })
    }

    #[test]
    fn test_remaining_value_uses_weight() {
        let part = SeasonPart::new(create_test_product(), dec("4.5"), 5, dec("0.2"));
        assert_eq!(part.total_value(), Some(dec("5400")));
        assert_eq!(part.remaining_value(), Some(dec("1080.0")));
    }

    #[test]
    fn test_parts_share_one_product() {
        let product = create_test_product();
        let first = SeasonPart::new(Arc::clone(&product), dec("1"), 12, dec("1"));
        let second = SeasonPart::new(Arc::clone(&product), dec("2"), 6, dec("0.5"));

        assert!(Arc::ptr_eq(&first.product, &second.product));
        assert_eq!(Arc::strong_count(&product), 3);
    }

    #[test]
    fn test_season_part_serialization() {
        let part = SeasonPart::new(create_test_product(), dec("1"), 12, dec("1.0"));
        let json = serde_json::to_string(&part).unwrap();
        assert!(json.contains("\"months_remaining\":12"));
        assert!(json.contains("\"weight_remaining\":\"1.0\""));
        assert!(json.contains("\"id\":\"vegetable_share\""));

        let back: SeasonPart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, part);
    }
}
