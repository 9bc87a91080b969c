//! Multi-line season proration.
//!
//! Each product line of a season has its own chain. The lines are prorated
//! independently and their schedules summed month by month.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{LineResult, MonthlyTotal, SeasonLine, SeasonResult};

use super::chain::calculate_chain_with_precision;
use super::schedule::{DEFAULT_CURRENCY_DECIMALS, verify_conservation};

/// Prorates every line of a season and aggregates the monthly totals.
///
/// See [`calculate_season_with_precision`].
pub fn calculate_season(lines: &[SeasonLine]) -> EngineResult<SeasonResult> {
    calculate_season_with_precision(lines, DEFAULT_CURRENCY_DECIMALS)
}

/// Prorates every line of a season at the given currency precision.
///
/// # Returns
///
/// Returns the per-line results and one [`MonthlyTotal`] per season month, or
/// an error if:
/// - There are no lines
/// - Two lines share the same `line_id`
/// - A line's first part covers a different number of months than the first line's
/// - Any line's chain is invalid
pub fn calculate_season_with_precision(
    lines: &[SeasonLine],
    currency_decimals: u32,
) -> EngineResult<SeasonResult> {
    let first = lines.first().ok_or(EngineError::EmptyChain)?;
    let season_months = first
        .chain
        .first()
        .map(|p| p.months_remaining)
        .ok_or(EngineError::EmptyChain)?;

    let mut seen = HashSet::new();
    for line in lines {
        if !seen.insert(line.line_id.as_str()) {
            return Err(EngineError::InvalidSeasonPart {
                part_index: 0,
                field: "line_id".to_string(),
                message: format!("line '{}' appears more than once", line.line_id),
            });
        }
        if let Some(head) = line.chain.first() {
            if head.months_remaining != season_months {
                return Err(EngineError::InvalidSeasonPart {
                    part_index: 0,
                    field: "months_remaining".to_string(),
                    message: format!(
                        "line '{}' covers {} months but the season has {}",
                        line.line_id, head.months_remaining, season_months
                    ),
                });
            }
        }
    }

    let mut results = Vec::with_capacity(lines.len());
    for line in lines {
        let result = calculate_chain_with_precision(&line.chain, currency_decimals)?;
        results.push(LineResult {
            line_id: line.line_id.clone(),
            result,
        });
    }

    let mut monthly_totals: Vec<MonthlyTotal> = (0..season_months)
        .map(|month_index| MonthlyTotal {
            month_index,
            amount: Decimal::ZERO,
        })
        .collect();

    let totals_overflow = || EngineError::CalculationError {
        message: "season totals overflow".to_string(),
    };

    for line in &results {
        for entry in &line.result.schedule {
            let total = &mut monthly_totals[entry.month_index as usize];
            total.amount = total
                .amount
                .checked_add(entry.amount)
                .ok_or_else(totals_overflow)?;
        }
    }

    let total_delivered_value = results
        .iter()
        .try_fold(Decimal::ZERO, |sum, l| {
            sum.checked_add(l.result.total_delivered_value)
        })
        .ok_or_else(totals_overflow)?;
    let total_charged = monthly_totals
        .iter()
        .try_fold(Decimal::ZERO, |sum, m| sum.checked_add(m.amount))
        .ok_or_else(totals_overflow)?;

    verify_conservation(total_delivered_value, total_charged, currency_decimals)?;

    info!(
        line_count = results.len(),
        season_months,
        total_charged = %total_charged.round_dp(currency_decimals),
        "Season prorated"
    );

    Ok(SeasonResult {
        calculation_id: Uuid::new_v4(),
        season_months,
        lines: results,
        monthly_totals,
        total_delivered_value,
        total_charged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Product, SeasonPart};
    use std::str::FromStr;
    use std::sync::Arc;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn product(id: &str, price: &str, frequency: &str) -> Arc<Product> {
        Arc::new(Product {
            id: id.to_string(),
            name: id.to_string(),
            base_price_per_unit: dec(price),
            frequency: dec(frequency),
        })
    }

    fn part(product: &Arc<Product>, quantity: &str, months: u32, weight: &str) -> SeasonPart {
        SeasonPart::new(Arc::clone(product), dec(quantity), months, dec(weight))
    }

    fn create_test_lines() -> Vec<SeasonLine> {
        let vegetables = product("vegetables", "100", "12");
        let eggs = product("eggs", "2", "48");
        vec![
            SeasonLine {
                line_id: "line_vegetables".to_string(),
                chain: vec![
                    part(&vegetables, "1", 12, "1"),
                    part(&vegetables, "2", 6, "0.5"),
                ],
            },
            SeasonLine {
                line_id: "line_eggs".to_string(),
                chain: vec![part(&eggs, "6", 12, "1"), part(&eggs, "0", 3, "0.25")],
            },
        ]
    }

    #[test]
    fn test_monthly_totals_sum_every_line() {
        let result = calculate_season(&create_test_lines()).unwrap();

        assert_eq!(result.season_months, 12);
        assert_eq!(result.lines.len(), 2);
        assert_eq!(result.monthly_totals.len(), 12);

        // Vegetables: 100 for 6 months, then 200. Eggs: 48 for 9 months, then
        // nothing once the order is cancelled on pace with deliveries.
        assert_eq!(result.monthly_totals[0].amount.round_dp(2), dec("148"));
        assert_eq!(result.monthly_totals[6].amount.round_dp(2), dec("248"));
        assert_eq!(result.monthly_totals[9].amount.round_dp(2), dec("200"));
    }

    #[test]
    fn test_season_conserves_value() {
        let result = calculate_season(&create_test_lines()).unwrap();

        // Vegetables deliver 600 + 1200, eggs 432 + 0.
        assert_eq!(result.total_delivered_value, dec("2232"));
        assert_eq!(result.total_charged.round_dp(2), dec("2232"));
    }

    #[test]
    fn test_mismatched_season_length_rejected() {
        let mut lines = create_test_lines();
        let eggs = product("eggs", "2", "48");
        lines[1].chain = vec![part(&eggs, "6", 10, "1")];

        match calculate_season(&lines) {
            Err(EngineError::InvalidSeasonPart { field, message, .. }) => {
                assert_eq!(field, "months_remaining");
                assert!(message.contains("line_eggs"));
            }
            other => panic!("Expected InvalidSeasonPart, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_line_rejected() {
        let mut lines = create_test_lines();
        lines[1].line_id = "line_vegetables".to_string();

        assert!(matches!(
            calculate_season(&lines),
            Err(EngineError::InvalidSeasonPart { ref field, .. }) if field == "line_id"
        ));
    }

    #[test]
    fn test_empty_season_rejected() {
        assert!(matches!(calculate_season(&[]), Err(EngineError::EmptyChain)));
    }

    #[test]
    fn test_invalid_line_chain_propagates() {
        let mut lines = create_test_lines();
        lines[1].chain.clear();

        assert!(matches!(calculate_season(&lines), Err(EngineError::EmptyChain)));
    }

    #[test]
    fn test_season_total_overflow_returns_error() {
        // Each line is worth 4.8e28 on its own; together they exceed Decimal.
        let bulk = product("bulk", "480000000000000", "100000000000000");
        let lines = vec![
            SeasonLine {
                line_id: "bulk_a".to_string(),
                chain: vec![part(&bulk, "1", 12, "1")],
            },
            SeasonLine {
                line_id: "bulk_b".to_string(),
                chain: vec![part(&bulk, "1", 12, "1")],
            },
        ];

        match calculate_season(&lines) {
            Err(EngineError::CalculationError { message }) => {
                assert!(message.contains("overflow"));
            }
            other => panic!("Expected CalculationError, got {:?}", other),
        }
    }
}
