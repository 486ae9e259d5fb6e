//! Sensor aggregation for Verdant.
//!
//! The heart of the crate is [`aggregator`]: pick the latest reading of each
//! sensor kind and fold those into one overall plant status. Everything else
//! feeds it (normalization, loading, placeholders) or consumes it (plant
//! health, the CSV log, preferences).

pub mod aggregator;
pub mod error;
pub mod health;
pub mod loader;
pub mod normalize;
pub mod placeholder;
pub mod preferences;
pub mod reading_log;
pub mod thresholds;
