//! Serde data model shared by the Verdant crates: sensor readings, plants,
//! thresholds, user preferences and the on-disk file wrappers.

pub mod file_formats;
pub mod lenient;
pub mod plant;
pub mod preferences;
pub mod sensor;
pub mod threshold;
