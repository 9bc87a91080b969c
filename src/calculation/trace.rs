//! Human-readable diagnostic trace.
//!
//! The rendered text is meant for audit and debugging. Its layout is not a
//! stable machine-readable contract; use the serialized [`ProrationResult`]
//! for that.

use std::fmt;

use rust_decimal::Decimal;

use crate::models::ProrationResult;

use super::schedule::round_currency;

/// Renders a proration result as a per-part and per-month trace.
///
/// # Examples
///
/// ```
/// use season_proration::calculation::{calculate_chain, render_trace};
/// use season_proration::models::{Product, SeasonPart};
/// use rust_decimal::Decimal;
/// use std::sync::Arc;
///
/// let product = Arc::new(Product {
///     id: "vegetable_share".to_string(),
///     name: "Vegetable share".to_string(),
///     base_price_per_unit: Decimal::from(100),
///     frequency: Decimal::from(12),
/// });
/// let chain = vec![SeasonPart::new(product, Decimal::ONE, 2, Decimal::ONE)];
/// let result = calculate_chain(&chain).unwrap();
///
/// let trace = render_trace(&result, 2);
/// assert!(trace.contains("01 - month 02: 600.00 (cumulative: 1200.00)"));
/// ```
pub fn render_trace(result: &ProrationResult, currency_decimals: u32) -> String {
    TraceView {
        result,
        currency_decimals,
    }
    .to_string()
}

struct TraceView<'a> {
    result: &'a ProrationResult,
    currency_decimals: u32,
}

impl TraceView<'_> {
    fn amount(&self, amount: Decimal) -> Decimal {
        let mut rounded = round_currency(amount, self.currency_decimals);
        rounded.rescale(self.currency_decimals);
        rounded
    }
}

impl fmt::Display for TraceView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_trace(f, self)
    }
}

fn write_trace(out: &mut impl fmt::Write, view: &TraceView<'_>) -> fmt::Result {
    let result = view.result;

    for part in &result.parts {
        writeln!(
            out,
            "part {:02} ({} x {}, {} month(s) remaining, weight {})",
            part.part_index + 1,
            part.quantity.normalize(),
            part.product_id,
            part.months_remaining,
            part.weight_remaining.normalize()
        )?;
        writeln!(
            out,
            "  effective: {} month(s), weight {}",
            part.effective_months,
            part.effective_weight.normalize()
        )?;
        writeln!(
            out,
            "  --> delivered_value: {}",
            view.amount(part.cumulative_delivered_value)
        )?;
        writeln!(
            out,
            "  --> remaining_value: {}",
            view.amount(part.remaining_value)
        )?;
        writeln!(
            out,
            "  --> cumulative_paid: {}",
            view.amount(part.cumulative_paid_after)
        )?;
        writeln!(
            out,
            "  --> monthly_due_effective: {}",
            view.amount(part.monthly_due_effective)
        )?;
    }

    writeln!(out, "------")?;
    writeln!(
        out,
        "delivered_value: {}",
        view.amount(result.total_delivered_value)
    )?;

    let mut cumulative = Decimal::ZERO;
    for entry in &result.schedule {
        cumulative += entry.amount;
        writeln!(
            out,
            "{:02} - month {:02}: {} (cumulative: {})",
            entry.part_index + 1,
            entry.month_index + 1,
            view.amount(entry.amount),
            view.amount(cumulative)
        )?;
    }

    for warning in &result.audit_trace.warnings {
        writeln!(out, "warning [{}]: {}", warning.code, warning.message)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::calculate_chain;
    use crate::models::{Product, SeasonPart};
    use std::str::FromStr;
    use std::sync::Arc;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_result() -> ProrationResult {
        let product = Arc::new(Product {
            id: "vegetable_share".to_string(),
            name: "Vegetable share".to_string(),
            base_price_per_unit: dec("100"),
            frequency: dec("12"),
        });
        let chain = vec![
            SeasonPart::new(Arc::clone(&product), dec("1"), 12, dec("1")),
            SeasonPart::new(Arc::clone(&product), dec("0.5"), 7, dec("0.7")),
            SeasonPart::new(Arc::clone(&product), dec("4.5"), 5, dec("0.2")),
            SeasonPart::new(product, dec("0"), 4, dec("0.1")),
        ];
        calculate_chain(&chain).unwrap()
    }

    #[test]
    fn test_trace_lists_every_part() {
        let trace = render_trace(&create_test_result(), 2);

        assert!(trace.contains("part 01 (1 x vegetable_share, 12 month(s) remaining, weight 1)"));
        assert!(trace.contains("part 04 (0 x vegetable_share, 4 month(s) remaining, weight 0.1)"));
        assert!(trace.contains("  --> monthly_due_effective: 232.00"));
        assert!(trace.contains("  --> cumulative_paid: 812.00"));
        assert!(trace.contains("delivered_value: 1200.00"));
    }

    #[test]
    fn test_trace_lists_every_month_with_running_total() {
        let trace = render_trace(&create_test_result(), 2);

        assert!(trace.contains("01 - month 01: 100.00 (cumulative: 100.00)"));
        assert!(trace.contains("02 - month 06: 40.00 (cumulative: 540.00)"));
        assert!(trace.contains("03 - month 08: 232.00 (cumulative: 812.00)"));
        assert!(trace.contains("04 - month 12: 97.00 (cumulative: 1200.00)"));
        assert_eq!(trace.lines().filter(|l| l.contains(" - month ")).count(), 12);
    }

    #[test]
    fn test_trace_respects_currency_decimals() {
        let trace = render_trace(&create_test_result(), 0);
        assert!(trace.contains("01 - month 01: 100 (cumulative: 100)"));
    }

    struct RejectingWriter {
        accepted_lines: usize,
    }

    impl fmt::Write for RejectingWriter {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            if self.accepted_lines >= 2 {
                return Err(fmt::Error);
            }
            self.accepted_lines += s.matches('\n').count();
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_stops_the_trace() {
        let result = create_test_result();
        let view = TraceView {
            result: &result,
            currency_decimals: 2,
        };
        let mut writer = RejectingWriter { accepted_lines: 0 };

        assert_eq!(write_trace(&mut writer, &view), Err(fmt::Error));
        assert_eq!(writer.accepted_lines, 2);
    }
}
