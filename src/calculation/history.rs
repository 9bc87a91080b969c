//! Change-history replay.
//!
//! A season's chain grows with every change. Replaying the history prorates
//! each prefix of the chain, which shows what the customer was billed as of
//! every change point.

use tracing::debug;

use crate::error::EngineResult;
use crate::models::{HistoryEntry, SeasonPart};

use super::chain::calculate_chain_with_precision;
use super::schedule::DEFAULT_CURRENCY_DECIMALS;
use super::validation::validate_chain;

/// Prorates every prefix `chain[..=k]` of a chain.
///
/// The whole chain is validated up front, so either every prefix is
/// evaluated or none is.
///
/// # Returns
///
/// One [`HistoryEntry`] per part, in chain order. Entry `k` holds the result
/// of the chain as it stood right after change `k`.
pub fn replay_history(chain: &[SeasonPart]) -> EngineResult<Vec<HistoryEntry>> {
    replay_history_with_precision(chain, DEFAULT_CURRENCY_DECIMALS)
}

/// Prorates every prefix of a chain at the given currency precision.
pub fn replay_history_with_precision(
    chain: &[SeasonPart],
    currency_decimals: u32,
) -> EngineResult<Vec<HistoryEntry>> {
    validate_chain(chain)?;

    (0..chain.len())
        .map(|change_index| {
            let result = calculate_chain_with_precision(&chain[..=change_index], currency_decimals)?;
            debug!(
                change_index,
                monthly_due = ?result.current_monthly_due(),
                "Replayed change"
            );
            Ok(HistoryEntry {
                change_index,
                result,
            })
        })
        .collect()
}
