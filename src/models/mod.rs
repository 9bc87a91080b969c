//! Core data models for the Season Proration Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod product;
mod proration_result;
mod season;
mod season_part;

pub use product::Product;
pub use proration_result::{
    AllocatedPart, AuditStep, AuditTrace, AuditWarning, HistoryEntry, ProrationResult,
    ScheduleEntry,
};
pub use season::{LineResult, MonthlyTotal, SeasonLine, SeasonResult};
pub use season_part::SeasonPart;
