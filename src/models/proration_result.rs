//! Proration result models for the Season Proration Engine.
//!
//! This module contains the [`ProrationResult`] type and its associated
//! structures capturing every output of a chain calculation: the allocated
//! parts, the month-by-month schedule, totals and the audit trace.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A season part after the engine allocated its share of the season.
///
/// This record is produced fresh by the engine; the input chain is never
/// modified.
///
/// # Example
///
/// ```
/// use season_proration::models::AllocatedPart;
/// use rust_decimal::Decimal;
///
/// let part = AllocatedPart {
///     part_index: 0,
///     product_id: "vegetable_share".to_string(),
///     quantity: Decimal::ONE,
///     months_remaining: 12,
///     weight_remaining: Decimal::ONE,
///     effective_months: 12,
///     effective_weight: Decimal::ONE,
///     total_value: Decimal::from(1200),
///     value_in_range: Decimal::from(1200),
///     cumulative_delivered_value: Decimal::from(1200),
///     remaining_value: Decimal::from(1200),
///     relevant_value: Decimal::from(1200),
///     cumulative_paid_before: Decimal::ZERO,
///     monthly_due_effective: Decimal::from(100),
///     cumulative_paid_after: Decimal::from(1200),
/// };
/// assert_eq!(part.paid_in_range(), Decimal::from(1200));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatedPart {
    /// Position of the part in the input chain.
    pub part_index: usize,
    /// The product this part orders.
    pub product_id: String,
    /// Units ordered while this part is in effect.
    pub quantity: Decimal,
    /// Months until season end when this part took effect.
    pub months_remaining: u32,
    /// Undelivered fraction of the season when this part took effect.
    pub weight_remaining: Decimal,
    /// Months billed at this part's rate before the next part takes over.
    pub effective_months: u32,
    /// Fraction of the season delivered while this part was in effect.
    pub effective_weight: Decimal,
    /// Value of this part's order over the full season.
    pub total_value: Decimal,
    /// Value delivered while this part was in effect.
    pub value_in_range: Decimal,
    /// Value delivered up to and including this part.
    pub cumulative_delivered_value: Decimal,
    /// Value still owed under this part's terms when it took effect.
    pub remaining_value: Decimal,
    /// Value delivered by earlier parts plus this part's remaining value.
    pub relevant_value: Decimal,
    /// Amount billed by earlier parts.
    pub cumulative_paid_before: Decimal,
    /// The reconciled charge per month while this part is in effect.
    pub monthly_due_effective: Decimal,
    /// Amount billed up to and including this part.
    pub cumulative_paid_after: Decimal,
}

impl AllocatedPart {
    /// Amount billed while this part was in effect.
    pub fn paid_in_range(&self) -> Decimal {
        self.monthly_due_effective * Decimal::from(self.effective_months)
    }
}

/// One month of the billing schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Zero-based month of the season.
    pub month_index: u32,
    /// Index of the season part whose rate applies in this month.
    pub part_index: usize,
    /// Amount charged for this month.
    pub amount: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for one part of the
/// allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Index of the season part this step concerns, if any.
    pub part_index: Option<usize>,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag inputs that are valid but unusual, such as a part that
/// charges a negative monthly amount to repay earlier over-billing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use season_proration::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     duration_us: 12,
/// };
/// assert!(trace.steps.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The complete result of prorating one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProrationResult {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// One allocated record per input part, in chain order.
    pub parts: Vec<AllocatedPart>,
    /// The charge for every month of the season.
    pub schedule: Vec<ScheduleEntry>,
    /// Value delivered over the whole season.
    pub total_delivered_value: Decimal,
    /// Sum of all scheduled charges.
    pub total_charged: Decimal,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

impl ProrationResult {
    /// Returns the monthly charge currently in effect: the last part's rate.
    pub fn current_monthly_due(&self) -> Option<Decimal> {
        self.parts.last().map(|p| p.monthly_due_effective)
    }

    /// Returns the length of the season in months.
    pub fn season_months(&self) -> u32 {
        self.parts.first().map_or(0, |p| p.months_remaining)
    }
}

/// The chain result after one change point of a season's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Index of the change (the last part of the evaluated prefix).
    pub change_index: usize,
    /// The result of prorating the chain as known at that change.
    pub result: ProrationResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_sample_part(index: usize, effective_months: u32, rate: &str) -> AllocatedPart {
        AllocatedPart {
            part_index: index,
            product_id: "vegetable_share".to_string(),
            quantity: dec("1"),
            months_remaining: 12,
            weight_remaining: dec("1"),
            effective_months,
            effective_weight: dec("0.5"),
            total_value: dec("1200"),
            value_in_range: dec("600"),
            cumulative_delivered_value: dec("600"),
            remaining_value: dec("1200"),
            relevant_value: dec("1200"),
            cumulative_paid_before: Decimal::ZERO,
            monthly_due_effective: dec(rate),
            cumulative_paid_after: dec(rate) * Decimal::from(effective_months),
        }
    }

    fn create_sample_result(parts: Vec<AllocatedPart>) -> ProrationResult {
        ProrationResult {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: "0.1.0".to_string(),
            parts,
            schedule: vec![],
            total_delivered_value: dec("1200"),
            total_charged: dec("1200"),
            audit_trace: AuditTrace {
                steps: vec![],
                warnings: vec![],
                duration_us: 0,
            },
        }
    }

    #[test]
    fn test_paid_in_range_multiplies_rate_by_effective_months() {
        let part = create_sample_part(0, 6, "100.50");
        assert_eq!(part.paid_in_range(), dec("603.00"));
    }

    #[test]
    fn test_current_monthly_due_is_last_part_rate() {
        let result = create_sample_result(vec![
            create_sample_part(0, 6, "100"),
            create_sample_part(1, 6, "140"),
        ]);
        assert_eq!(result.current_monthly_due(), Some(dec("140")));
        assert_eq!(result.season_months(), 12);
    }

    #[test]
    fn test_empty_result_has_no_current_rate() {
        let result = create_sample_result(vec![]);
        assert_eq!(result.current_monthly_due(), None);
        assert_eq!(result.season_months(), 0);
    }

    #[test]
    fn test_schedule_entry_serialization() {
        let entry = ScheduleEntry {
            month_index: 3,
            part_index: 1,
            amount: dec("97.25"),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"month_index":3,"part_index":1,"amount":"97.25"}"#);
    }

    #[test]
    fn test_result_round_trips_through_json() {
        let result = create_sample_result(vec![create_sample_part(0, 12, "100")]);
        let json = serde_json::to_string(&result).unwrap();
        let back: ProrationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
