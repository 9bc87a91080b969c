//! Effective share assignment (first allocation pass).
//!
//! Each season part is attributed the months and the delivered fraction of
//! the season between its own start and the start of the next part.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, SeasonPart};

/// The share of the season attributed to one season part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveShare {
    /// Months during which this part's rate applies.
    pub effective_months: u32,
    /// Fraction of the season delivered while this part was in effect.
    pub effective_weight: Decimal,
    /// Value of this part's order over the full season.
    pub total_value: Decimal,
    /// Value delivered while this part was in effect.
    pub value_in_range: Decimal,
    /// Running total of delivered value up to and including this part.
    pub cumulative_delivered_value: Decimal,
}

/// The result of the first allocation pass, including audit steps.
#[derive(Debug, Clone)]
pub struct EffectiveSharesResult {
    /// One share per input part, in chain order.
    pub shares: Vec<EffectiveShare>,
    /// One audit step per part.
    pub audit_steps: Vec<AuditStep>,
}

impl EffectiveSharesResult {
    /// Value delivered over the whole chain.
    pub fn total_delivered_value(&self) -> Decimal {
        self.shares
            .last()
            .map_or(Decimal::ZERO, |s| s.cumulative_delivered_value)
    }
}

/// Assigns every part its effective months, effective weight and delivered value.
///
/// For part `i` with successor `next`:
///
/// - `effective_months = months_remaining - next.months_remaining` (or the
///   part's own months for the last part)
/// - `effective_weight = weight_remaining - next.weight_remaining` (or the
///   part's own weight for the last part)
/// - `value_in_range = total_value * effective_weight`
///
/// # Returns
///
/// Returns an `OrderingViolation` if months increase along the chain, or a
/// `ValueOverflow` if a part's value does not fit in a `Decimal`.
///
/// # Examples
///
/// ```
/// use season_proration::calculation::assign_effective_shares;
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
/// let chain = vec![
///     SeasonPart::new(Arc::clone(&product), Decimal::ONE, 12, Decimal::ONE),
///     SeasonPart::new(product, Decimal::ONE, 6, Decimal::from_str("0.7").unwrap()),
/// ];
/// let result = assign_effective_shares(&chain, 1)?;
/// assert_eq!(result.shares[0].effective_months, 6);
/// assert_eq!(result.shares[0].effective_weight, Decimal::from_str("0.3").unwrap());
/// # Ok::<(), season_proration::error::EngineError>(())
/// ```
pub fn assign_effective_shares(
    chain: &[SeasonPart],
    start_step_number: u32,
) -> EngineResult<EffectiveSharesResult> {
    let mut shares = Vec::with_capacity(chain.len());
    let mut audit_steps = Vec::with_capacity(chain.len());
    let mut cumulative_delivered_value = Decimal::ZERO;

    for (part_index, current) in chain.iter().enumerate() {
        let next = chain.get(part_index + 1);

        let next_months = next.map_or(0, |n| n.months_remaining);
        let effective_months = current
            .months_remaining
            .checked_sub(next_months)
            .ok_or_else(|| EngineError::OrderingViolation {
                part_index: part_index + 1,
                field: "months_remaining".to_string(),
                previous: Decimal::from(current.months_remaining),
                current: Decimal::from(next_months),
            })?;
        let effective_weight = current
            .weight_remaining
            .checked_sub(next.map_or(Decimal::ZERO, |n| n.weight_remaining))
            .ok_or_else(|| EngineError::overflow(part_index, "effective_weight"))?;

        let total_value = current
            .total_value()
            .ok_or_else(|| EngineError::overflow(part_index, "total_value"))?;
        let value_in_range = total_value
            .checked_mul(effective_weight)
            .ok_or_else(|| EngineError::overflow(part_index, "value_in_range"))?;
        cumulative_delivered_value = cumulative_delivered_value
            .checked_add(value_in_range)
            .ok_or_else(|| EngineError::overflow(part_index, "cumulative_delivered_value"))?;

        audit_steps.push(AuditStep {
            step_number: start_step_number + part_index as u32,
            rule_id: "effective_share".to_string(),
            rule_name: "Effective Share Assignment".to_string(),
            part_index: Some(part_index),
            input: serde_json::json!({
                "months_remaining": current.months_remaining,
                "weight_remaining": current.weight_remaining.normalize().to_string(),
                "next_months_remaining": next.map(|n| n.months_remaining),
                "next_weight_remaining": next.map(|n| n.weight_remaining.normalize().to_string()),
                "quantity": current.quantity.normalize().to_string(),
                "total_value": total_value.normalize().to_string(),
            }),
            output: serde_json::json!({
                "effective_months": effective_months,
                "effective_weight": effective_weight.normalize().to_string(),
                "value_in_range": value_in_range.normalize().to_string(),
                "cumulative_delivered_value": cumulative_delivered_value.normalize().to_string(),
            }),
            reasoning: format!(
                "Part {} is in effect for {} month(s) and delivers {} of the season: ${} x {} = ${}",
                part_index,
                effective_months,
                effective_weight.normalize(),
                total_value.normalize(),
                effective_weight.normalize(),
                value_in_range.normalize()
            ),
        });

        shares.push(EffectiveShare {
            effective_months,
            effective_weight,
            total_value,
            value_in_range,
            cumulative_delivered_value,
        });
    }

    Ok(EffectiveSharesResult {
        shares,
        audit_steps,
    })
}
