//! Configuration loading and management for the Season Proration Engine.
//!
//! This module loads a season catalog (season metadata and the products on
//! offer) from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use season_proration::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/vegetable-share-2025").unwrap();
//! println!("Loaded season: {}", config.season().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{ProductEntry, ProductsConfig, SeasonConfig, SeasonMetadata};
