//! Request decoding for the Season Proration Engine.
//!
//! This module defines the JSON/YAML structures an ordering system hands to
//! the engine and resolves them against a season catalog.

mod chain_request;

pub use chain_request::{ChainRequest, SeasonPartRequest, SeasonRequest};
