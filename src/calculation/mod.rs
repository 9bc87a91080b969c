//! Calculation logic for the Season Proration Engine.
//!
//! This module contains chain validation, the two allocation passes
//! (effective shares, then reconciled monthly charges), schedule expansion
//! and the conservation check, change-history replay, multi-line season
//! aggregation, and the human-readable diagnostic trace.

mod chain;
mod effective_shares;
mod history;
mod monthly_due;
mod schedule;
mod season;
mod trace;
mod validation;

pub use chain::{calculate_chain, calculate_chain_with_precision};
pub use effective_shares::{EffectiveShare, EffectiveSharesResult, assign_effective_shares};
pub use history::{replay_history, replay_history_with_precision};
pub use monthly_due::{MonthlyChargesResult, assign_monthly_charges};
pub use schedule::{
    DEFAULT_CURRENCY_DECIMALS, build_schedule, round_currency, round_schedule,
    verify_conservation,
};
pub use season::{calculate_season, calculate_season_with_precision};
pub use trace::render_trace;
pub use validation::validate_chain;
