//! Chain validation.
//!
//! This module checks a chain of season parts against the ordering and range
//! rules the allocation relies on. Validation runs before any computation so
//! that no partial result is ever produced for an invalid chain.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, SeasonPart};

/// Validates a chain of season parts.
///
/// # Rules
///
/// - The chain must not be empty.
/// - Every product must have a positive `base_price_per_unit` and `frequency`.
/// - Every `quantity` must be non-negative.
/// - Every `weight_remaining` must lie in `0..=1`; the first must equal 1.
/// - Every `months_remaining` must be at least 1.
/// - Neither `months_remaining` nor `weight_remaining` may increase from one
///   part to the next.
///
/// # Returns
///
/// The first rule violation found, in chain order.
///
/// # Examples
///
/// ```
/// use season_proration::calculation::validate_chain;
/// use season_proration::error::EngineError;
///
/// let result = validate_chain(&[]);
/// assert!(matches!(result, Err(EngineError::EmptyChain)));
/// ```
pub fn validate_chain(chain: &[SeasonPart]) -> EngineResult<()> {
    if chain.is_empty() {
        return Err(EngineError::EmptyChain);
    }

    let mut previous: Option<&SeasonPart> = None;
    for (part_index, part) in chain.iter().enumerate() {
        validate_part(part_index, part)?;

        match previous {
            None => {
                if part.weight_remaining != Decimal::ONE {
                    return Err(EngineError::InvalidSeasonPart {
                        part_index,
                        field: "weight_remaining".to_string(),
                        message: format!(
                            "first part must start with the full season (1), got {}",
                            part.weight_remaining
                        ),
                    });
                }
            }
            Some(prev) => {
                if part.months_remaining > prev.months_remaining {
                    return Err(EngineError::OrderingViolation {
                        part_index,
                        field: "months_remaining".to_string(),
                        previous: Decimal::from(prev.months_remaining),
                        current: Decimal::from(part.months_remaining),
                    });
                }
                if part.weight_remaining > prev.weight_remaining {
                    return Err(EngineError::OrderingViolation {
                        part_index,
                        field: "weight_remaining".to_string(),
                        previous: prev.weight_remaining,
                        current: part.weight_remaining,
                    });
                }
            }
        }

        previous = Some(part);
    }

    Ok(())
}

fn validate_part(part_index: usize, part: &SeasonPart) -> EngineResult<()> {
    if part.product.base_price_per_unit <= Decimal::ZERO {
        return Err(EngineError::InvalidProduct {
            part_index,
            field: "base_price_per_unit".to_string(),
            value: part.product.base_price_per_unit,
        });
    }
    if part.product.frequency <= Decimal::ZERO {
        return Err(EngineError::InvalidProduct {
            part_index,
            field: "frequency".to_string(),
            value: part.product.frequency,
        });
    }
    if part.quantity < Decimal::ZERO {
        return Err(EngineError::InvalidSeasonPart {
            part_index,
            field: "quantity".to_string(),
            message: format!("must not be negative, got {}", part.quantity),
        });
    }
    if part.weight_remaining < Decimal::ZERO || part.weight_remaining > Decimal::ONE {
        return Err(EngineError::InvalidSeasonPart {
            part_index,
            field: "weight_remaining".to_string(),
            message: format!("must be between 0 and 1, got {}", part.weight_remaining),
        });
    }
    if part.months_remaining == 0 {
        return Err(EngineError::ZeroMonthsRemaining { part_index });
    }
    Ok(())
}

/// Builds the audit step recording a successful validation.
pub(crate) fn validation_audit_step(chain: &[SeasonPart], step_number: u32) -> AuditStep {
    let season_months = chain.first().map_or(0, |p| p.months_remaining);
    AuditStep {
        step_number,
        rule_id: "chain_validation".to_string(),
        rule_name: "Season Chain Validation".to_string(),
        part_index: None,
        input: serde_json::json!({
            "part_count": chain.len(),
            "season_months": season_months,
        }),
        output: serde_json::json!({
            "valid": true,
        }),
        reasoning: format!(
            "Validated {} season part(s) over a {}-month season",
            chain.len(),
            season_months
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;
    use std::str::FromStr;
    use std::sync::Arc;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn product_with(price: &str, frequency: &str) -> Arc<Product> {
        Arc::new(Product {
            id: "vegetable_share".to_string(),
            name: "Vegetable share".to_string(),
            base_price_per_unit: dec(price),
            frequency: dec(frequency),
        })
    }

    fn part(quantity: &str, months: u32, weight: &str) -> SeasonPart {
        SeasonPart::new(product_with("100", "12"), dec(quantity), months, dec(weight))
    }

    #[test]
    fn test_valid_chain_passes() {
        let chain = vec![
            part("1", 12, "1"),
            part("0.5", 7, "0.7"),
            part("4.5", 5, "0.2"),
            part("0", 4, "0.1"),
        ];
        assert!(validate_chain(&chain).is_ok());
    }

    #[test]
    fn test_equal_months_and_weights_are_allowed() {
        let chain = vec![part("1", 12, "1"), part("2", 12, "1"), part("2", 6, "1")];
        assert!(validate_chain(&chain).is_ok());
    }

    #[test]
    fn test_empty_chain_rejected() {
        assert!(matches!(validate_chain(&[]), Err(EngineError::EmptyChain)));
    }

    #[test]
    fn test_first_weight_must_be_full_season() {
        let chain = vec![part("1", 12, "0.9")];
        match validate_chain(&chain) {
            Err(EngineError::InvalidSeasonPart {
                part_index, field, ..
            }) => {
                assert_eq!(part_index, 0);
                assert_eq!(field, "weight_remaining");
            }
            other => panic!("Expected InvalidSeasonPart, got {:?}", other),
        }
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let chain = vec![SeasonPart::new(
            product_with("0", "12"),
            dec("1"),
            12,
            dec("1"),
        )];
        match validate_chain(&chain) {
            Err(EngineError::InvalidProduct {
                part_index,
                field,
                value,
            }) => {
                assert_eq!(part_index, 0);
                assert_eq!(field, "base_price_per_unit");
                assert_eq!(value, Decimal::ZERO);
            }
            other => panic!("Expected InvalidProduct, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_frequency_rejected_on_later_part() {
        let chain = vec![
            part("1", 12, "1"),
            SeasonPart::new(product_with("100", "-1"), dec("1"), 6, dec("0.5")),
        ];
        match validate_chain(&chain) {
            Err(EngineError::InvalidProduct {
                part_index, field, ..
            }) => {
                assert_eq!(part_index, 1);
                assert_eq!(field, "frequency");
            }
            other => panic!("Expected InvalidProduct, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let chain = vec![part("-1", 12, "1")];
        assert!(matches!(
            validate_chain(&chain),
            Err(EngineError::InvalidSeasonPart { ref field, .. }) if field == "quantity"
        ));
    }

    #[test]
    fn test_weight_above_one_rejected() {
        let chain = vec![part("1", 12, "1"), part("1", 6, "1.5")];
        assert!(matches!(
            validate_chain(&chain),
            Err(EngineError::InvalidSeasonPart { part_index: 1, .. })
        ));
    }

    #[test]
    fn test_zero_months_rejected() {
        let chain = vec![part("1", 12, "1"), part("1", 0, "0")];
        assert!(matches!(
            validate_chain(&chain),
            Err(EngineError::ZeroMonthsRemaining { part_index: 1 })
        ));
    }

    #[test]
    fn test_increasing_months_rejected() {
        let chain = vec![part("1", 6, "1"), part("1", 8, "0.5")];
        match validate_chain(&chain) {
            Err(EngineError::OrderingViolation {
                part_index,
                field,
                previous,
                current,
            }) => {
                assert_eq!(part_index, 1);
                assert_eq!(field, "months_remaining");
                assert_eq!(previous, dec("6"));
                assert_eq!(current, dec("8"));
            }
            other => panic!("Expected OrderingViolation, got {:?}", other),
        }
    }

    #[test]
    fn test_increasing_weight_rejected() {
        let chain = vec![part("1", 12, "1"), part("1", 6, "0.4"), part("1", 3, "0.6")];
        assert!(matches!(
            validate_chain(&chain),
            Err(EngineError::OrderingViolation { part_index: 2, ref field, .. })
                if field == "weight_remaining"
        ));
    }

    #[test]
    fn test_validation_audit_step_records_chain_shape() {
        let chain = vec![part("1", 12, "1"), part("1", 6, "0.5")];
        let step = validation_audit_step(&chain, 1);
        assert_eq!(step.rule_id, "chain_validation");
        assert_eq!(step.input["part_count"], 2);
        assert_eq!(step.input["season_months"], 12);
        assert_eq!(step.output["valid"], true);
    }
}
