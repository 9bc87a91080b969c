//! Season Proration Engine
//!
//! This crate computes fair monthly charges for a subscription season whose
//! quantity, products or remaining term change partway through. Every change
//! appends a season part to a chain; the engine reallocates the charge so that
//! the sum of all monthly payments equals the value actually delivered.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod request;
