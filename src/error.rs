//! Error types for the Season Proration Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while prorating a season.

use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the Season Proration Engine.
///
/// Validation variants carry the index of the offending season part so the
/// caller can fix the input chain.
///
/// # Example
///
/// ```
/// use season_proration::error::EngineError;
///
/// let error = EngineError::ZeroMonthsRemaining { part_index: 2 };
/// assert_eq!(error.to_string(), "Season part 2 has zero months remaining");
/// assert!(error.is_validation_error());
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// The chain contained no season parts.
    #[error("Season chain is empty")]
    EmptyChain,

    /// A product referenced by a season part has a non-positive price or frequency.
    #[error("Invalid product on season part {part_index}: {field} must be positive, got {value}")]
    InvalidProduct {
        /// Index of the season part referencing the product.
        part_index: usize,
        /// The offending product field.
        field: String,
        /// The offending value.
        value: Decimal,
    },

    /// A season part carried a value outside its allowed range.
    #[error("Invalid season part {part_index} field '{field}': {message}")]
    InvalidSeasonPart {
        /// Index of the offending season part.
        part_index: usize,
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A season part increased a value that must never increase along the chain.
    #[error(
        "Season part {part_index} breaks chain ordering: {field} increased from {previous} to {current}"
    )]
    OrderingViolation {
        /// Index of the part that broke the ordering.
        part_index: usize,
        /// The field whose ordering was violated.
        field: String,
        /// Value on the preceding part.
        previous: Decimal,
        /// Value on the offending part.
        current: Decimal,
    },

    /// A season part has no months left to spread its charge over.
    #[error("Season part {part_index} has zero months remaining")]
    ZeroMonthsRemaining {
        /// Index of the offending season part.
        part_index: usize,
    },

    /// A season part's amounts are too large to compute exactly.
    #[error("Season part {part_index} overflows while computing {field}")]
    ValueOverflow {
        /// Index of the season part whose value overflowed.
        part_index: usize,
        /// The quantity being computed.
        field: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Product id was not found in the catalog.
    #[error("Product not found: {id}")]
    ProductNotFound {
        /// The product id that was not found.
        id: String,
    },

    /// A chain or season request could not be decoded.
    #[error("Failed to parse request: {message}")]
    RequestParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    pub(crate) fn overflow(part_index: usize, field: &str) -> Self {
        EngineError::ValueOverflow {
            part_index,
            field: field.to_string(),
        }
    }

    /// Returns true if the error was caused by an invalid input chain.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            EngineError::EmptyChain
                | EngineError::InvalidProduct { .. }
                | EngineError::InvalidSeasonPart { .. }
                | EngineError::OrderingViolation { .. }
                | EngineError::ZeroMonthsRemaining { .. }
                | EngineError::ValueOverflow { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
