//! Chain proration.
//!
//! This module ties the allocation together: validate the chain, assign
//! effective shares, derive monthly charges, expand the schedule and check that
//! the season's charges add up to the value it delivered.

use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditTrace, ProrationResult, SeasonPart};

use super::effective_shares::assign_effective_shares;
use super::monthly_due::assign_monthly_charges;
use super::schedule::{DEFAULT_CURRENCY_DECIMALS, build_schedule, verify_conservation};
use super::validation::{validate_chain, validation_audit_step};

/// Prorates a chain of season parts at the default currency precision.
///
/// See [`calculate_chain_with_precision`].
///
/// # Examples
///
/// ```
/// use season_proration::calculation::calculate_chain;
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
///     SeasonPart::new(Arc::clone(&product), Decimal::ONE, 6, Decimal::from_str("0.7").unwrap()),
///     SeasonPart::new(product, Decimal::ONE, 3, Decimal::from_str("0.2").unwrap()),
/// ];
///
/// let result = calculate_chain(&chain).unwrap();
/// assert_eq!(result.schedule.len(), 12);
/// assert_eq!(result.total_charged.round_dp(2), Decimal::from(1200));
/// ```
pub fn calculate_chain(chain: &[SeasonPart]) -> EngineResult<ProrationResult> {
    calculate_chain_with_precision(chain, DEFAULT_CURRENCY_DECIMALS)
}

/// Prorates a chain of season parts.
///
/// # Arguments
///
/// * `chain` - Season parts in the chronological order of the changes
/// * `currency_decimals` - Precision at which charged and delivered totals must agree
///
/// # Returns
///
/// Returns a `ProrationResult` with one allocated record per part and the
/// charge of every month of the season, or an error if:
/// - The chain fails validation (nothing is computed in that case)
/// - The charged total does not match the delivered value at currency precision
pub fn calculate_chain_with_precision(
    chain: &[SeasonPart],
    currency_decimals: u32,
) -> EngineResult<ProrationResult> {
    let start_time = Instant::now();
    let calculation_id = Uuid::new_v4();

    if let Err(err) = validate_chain(chain) {
        warn!(
            calculation_id = %calculation_id,
            error = %err,
            "Season chain rejected"
        );
        return Err(err);
    }

    let mut audit_steps: Vec<AuditStep> = Vec::with_capacity(chain.len() * 2 + 1);
    let mut step_number: u32 = 1;

    audit_steps.push(validation_audit_step(chain, step_number));
    step_number += 1;

    // Pass 1: effective shares
    let shares = assign_effective_shares(chain, step_number)?;
    step_number += shares.audit_steps.len() as u32;
    let total_delivered_value = shares.total_delivered_value();

    // Pass 2: monthly charges
    let charges = assign_monthly_charges(chain, &shares.shares, step_number)?;

    for part in &charges.parts {
        debug!(
            calculation_id = %calculation_id,
            part_index = part.part_index,
            effective_months = part.effective_months,
            effective_weight = %part.effective_weight,
            value_in_range = %part.value_in_range,
            cumulative_delivered_value = %part.cumulative_delivered_value,
            remaining_value = %part.remaining_value,
            cumulative_paid = %part.cumulative_paid_after,
            monthly_due_effective = %part.monthly_due_effective,
            "Season part allocated"
        );
    }

    let schedule = build_schedule(&charges.parts);
    let total_charged = schedule
        .iter()
        .try_fold(Decimal::ZERO, |sum, e| sum.checked_add(e.amount))
        .ok_or_else(|| EngineError::CalculationError {
            message: "charged total overflows".to_string(),
        })?;

    verify_conservation(total_delivered_value, total_charged, currency_decimals)?;

    audit_steps.extend(shares.audit_steps);
    audit_steps.extend(charges.audit_steps);

    let duration_us = start_time.elapsed().as_micros() as u64;
    info!(
        calculation_id = %calculation_id,
        part_count = chain.len(),
        total_delivered_value = %total_delivered_value.round_dp(currency_decimals),
        total_charged = %total_charged.round_dp(currency_decimals),
        duration_us,
        "Season chain prorated"
    );

    Ok(ProrationResult {
        calculation_id,
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        parts: charges.parts,
        schedule,
        total_delivered_value,
        total_charged,
        audit_trace: AuditTrace {
            steps: audit_steps,
            warnings: charges.warnings,
            duration_us,
        },
    })
}
