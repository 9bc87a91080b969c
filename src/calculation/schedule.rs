//! Monthly schedule construction and the conservation check.
//!
//! The schedule lists the charge of every month of the season, month by month,
//! at the rate of the part in effect during that month.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};
use crate::models::{AllocatedPart, ScheduleEntry};

/// Default number of decimals for currency amounts.
pub const DEFAULT_CURRENCY_DECIMALS: u32 = 2;

/// Rounds an amount to `decimals` places, half away from zero.
pub fn round_currency(amount: Decimal, decimals: u32) -> Decimal {
    amount.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
}

/// Expands allocated parts into one schedule entry per month.
///
/// Parts with zero effective months contribute no entries.
///
/// # Examples
///
/// ```
/// use season_proration::calculation::build_schedule;
/// use season_proration::models::AllocatedPart;
/// use rust_decimal::Decimal;
///
/// let part = AllocatedPart {
///     part_index: 0,
///     product_id: "vegetable_share".to_string(),
///     quantity: Decimal::ONE,
///     months_remaining: 3,
///     weight_remaining: Decimal::ONE,
///     effective_months: 3,
///     effective_weight: Decimal::ONE,
///     total_value: Decimal::from(300),
///     value_in_range: Decimal::from(300),
///     cumulative_delivered_value: Decimal::from(300),
///     remaining_value: Decimal::from(300),
///     relevant_value: Decimal::from(300),
///     cumulative_paid_before: Decimal::ZERO,
///     monthly_due_effective: Decimal::from(100),
///     cumulative_paid_after: Decimal::from(300),
/// };
/// let schedule = build_schedule(&[part]);
/// assert_eq!(schedule.len(), 3);
/// assert_eq!(schedule[2].month_index, 2);
/// ```
pub fn build_schedule(parts: &[AllocatedPart]) -> Vec<ScheduleEntry> {
    let mut schedule = Vec::new();
    let mut month_index = 0;

    for part in parts {
        for _ in 0..part.effective_months {
            schedule.push(ScheduleEntry {
                month_index,
                part_index: part.part_index,
                amount: part.monthly_due_effective,
            });
            month_index += 1;
        }
    }

    schedule
}

/// Rounds a schedule to invoiceable amounts without losing value.
///
/// Each month is rounded to `decimals` places after adding the rounding
/// remainder carried from the previous month, so the rounded amounts sum to
/// the rounded total of the unrounded schedule.
pub fn round_schedule(schedule: &[ScheduleEntry], decimals: u32) -> Vec<ScheduleEntry> {
    let mut carry = Decimal::ZERO;

    schedule
        .iter()
        .map(|entry| {
            let exact = entry.amount + carry;
            let rounded = round_currency(exact, decimals);
            carry = exact - rounded;
            ScheduleEntry {
                month_index: entry.month_index,
                part_index: entry.part_index,
                amount: rounded,
            }
        })
        .collect()
}

/// Checks that the amount charged equals the value delivered at currency precision.
///
/// The difference is rounded rather than each total, so a delivered value
/// sitting exactly on a rounding midpoint does not trip the check.
///
/// # Returns
///
/// Returns a `CalculationError` naming both totals when their difference
/// does not round to zero at `decimals` places.
pub fn verify_conservation(
    total_delivered_value: Decimal,
    total_charged: Decimal,
    decimals: u32,
) -> EngineResult<()> {
    let difference = round_currency(total_charged - total_delivered_value, decimals);

    if !difference.is_zero() {
        return Err(EngineError::CalculationError {
            message: format!(
                "conservation of value violated: charged {} but delivered {}",
                round_currency(total_charged, decimals),
                round_currency(total_delivered_value, decimals)
            ),
        });
    }
    Ok(())
}
