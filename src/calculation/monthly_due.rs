//! Monthly charge assignment (second allocation pass).
//!
//! Each part's monthly rate is chosen so that, charged for the rest of the
//! season, it settles the difference between what the customer owes given
//! everything known at that change and what has already been billed. Any
//! earlier over- or under-billing is folded into the new rate.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AllocatedPart, AuditStep, AuditWarning, SeasonPart};

use super::effective_shares::EffectiveShare;

/// The result of the second allocation pass.
#[derive(Debug, Clone)]
pub struct MonthlyChargesResult {
    /// One allocated record per input part, in chain order.
    pub parts: Vec<AllocatedPart>,
    /// One audit step per part.
    pub audit_steps: Vec<AuditStep>,
    /// Warnings for unusual but valid allocations.
    pub warnings: Vec<AuditWarning>,
    /// Amount billed over the whole chain.
    pub total_charged: Decimal,
}

/// Derives the reconciled monthly charge of every part.
///
/// With `cumulative_paid` starting at zero, for each part `i`:
///
/// - `remaining_value = total_value * weight_remaining`
/// - `relevant_value = cumulative_delivered_value[i - 1] + remaining_value`
/// - `monthly_due_effective = (relevant_value - cumulative_paid) / months_remaining`
/// - `cumulative_paid += monthly_due_effective * effective_months`
///
/// # Arguments
///
/// * `chain` - The validated chain of season parts
/// * `shares` - The effective shares from [`super::assign_effective_shares`]
/// * `start_step_number` - The starting step number for audit trail sequencing
///
/// # Returns
///
/// Returns the allocated parts, or an error if the shares do not match the
/// chain, a part has zero months remaining, or an amount overflows `Decimal`.
pub fn assign_monthly_charges(
    chain: &[SeasonPart],
    shares: &[EffectiveShare],
    start_step_number: u32,
) -> EngineResult<MonthlyChargesResult> {
    if chain.len() != shares.len() {
        return Err(EngineError::CalculationError {
            message: format!(
                "{} effective shares for a chain of {} parts",
                shares.len(),
                chain.len()
            ),
        });
    }

    let mut parts = Vec::with_capacity(chain.len());
    let mut audit_steps = Vec::with_capacity(chain.len());
    let mut warnings = Vec::new();
    let mut cumulative_paid = Decimal::ZERO;
    let mut delivered_before = Decimal::ZERO;

    for (part_index, (current, share)) in chain.iter().zip(shares).enumerate() {
        if current.months_remaining == 0 {
            return Err(EngineError::ZeroMonthsRemaining { part_index });
        }

        let overflow = |field: &str| EngineError::overflow(part_index, field);

        let remaining_value = current
            .remaining_value()
            .ok_or_else(|| overflow("remaining_value"))?;
        let relevant_value = delivered_before
            .checked_add(remaining_value)
            .ok_or_else(|| overflow("relevant_value"))?;
        let cumulative_paid_before = cumulative_paid;
        let monthly_due_effective = relevant_value
            .checked_sub(cumulative_paid_before)
            .and_then(|outstanding| {
                outstanding.checked_div(Decimal::from(current.months_remaining))
            })
            .ok_or_else(|| overflow("monthly_due_effective"))?;
        cumulative_paid = monthly_due_effective
            .checked_mul(Decimal::from(share.effective_months))
            .and_then(|paid_in_range| cumulative_paid.checked_add(paid_in_range))
            .ok_or_else(|| overflow("cumulative_paid"))?;

        if monthly_due_effective < Decimal::ZERO {
            warnings.push(AuditWarning {
                code: "NEGATIVE_MONTHLY_DUE".to_string(),
                message: format!(
                    "Part {} credits {} per month to repay earlier over-billing",
                    part_index,
                    monthly_due_effective.abs().round_dp(2)
                ),
                severity: "medium".to_string(),
            });
        }

        audit_steps.push(AuditStep {
            step_number: start_step_number + part_index as u32,
            rule_id: "monthly_due".to_string(),
            rule_name: "Monthly Charge Reconciliation".to_string(),
            part_index: Some(part_index),
            input: serde_json::json!({
                "delivered_before": delivered_before.normalize().to_string(),
                "remaining_value": remaining_value.normalize().to_string(),
                "cumulative_paid_before": cumulative_paid_before.normalize().to_string(),
                "months_remaining": current.months_remaining,
                "effective_months": share.effective_months,
            }),
            output: serde_json::json!({
                "relevant_value": relevant_value.normalize().to_string(),
                "monthly_due_effective": monthly_due_effective.normalize().to_string(),
                "cumulative_paid_after": cumulative_paid.normalize().to_string(),
            }),
            reasoning: format!(
                "(${} delivered + ${} remaining - ${} paid) / {} month(s) = ${} per month for {} month(s)",
                delivered_before.round_dp(2),
                remaining_value.round_dp(2),
                cumulative_paid_before.round_dp(2),
                current.months_remaining,
                monthly_due_effective.round_dp(2),
                share.effective_months
            ),
        });

        parts.push(AllocatedPart {
            part_index,
            product_id: current.product.id.clone(),
            quantity: current.quantity,
            months_remaining: current.months_remaining,
            weight_remaining: current.weight_remaining,
            effective_months: share.effective_months,
            effective_weight: share.effective_weight,
            total_value: share.total_value,
            value_in_range: share.value_in_range,
            cumulative_delivered_value: share.cumulative_delivered_value,
            remaining_value,
            relevant_value,
            cumulative_paid_before,
            monthly_due_effective,
            cumulative_paid_after: cumulative_paid,
        });

        delivered_before = share.cumulative_delivered_value;
    }

    Ok(MonthlyChargesResult {
        parts,
        audit_steps,
        warnings,
        total_charged: cumulative_paid,
    })
}
