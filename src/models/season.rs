//! Multi-line season models.
//!
//! A season order may contain several product lines, each with its own chain
//! of season parts. These types carry the lines into the engine and the
//! aggregated monthly totals back out.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ProrationResult, SeasonPart};

/// One product line of a season with its chain of changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonLine {
    /// Identifier of the line, unique within the season.
    pub line_id: String,
    /// The chain of season parts for this line, in chronological order.
    pub chain: Vec<SeasonPart>,
}

/// The prorated result of one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineResult {
    /// Identifier of the line.
    pub line_id: String,
    /// The line's chain result.
    pub result: ProrationResult,
}

/// The total charge of all lines for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    /// Zero-based month of the season.
    pub month_index: u32,
    /// Sum of every line's charge for this month.
    pub amount: Decimal,
}

/// The prorated result of a whole season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonResult {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// Length of the season in months.
    pub season_months: u32,
    /// Per-line results, in input order.
    pub lines: Vec<LineResult>,
    /// Combined charge per month across all lines.
    pub monthly_totals: Vec<MonthlyTotal>,
    /// Value delivered over the season across all lines.
    pub total_delivered_value: Decimal,
    /// Sum of all monthly totals.
    pub total_charged: Decimal,
}
