//! Synthetic readings for plants that have not reported anything yet.
//!
//! Only used when a caller opts in through `Fallback::Placeholder`; values
//! sit at the middle of each healthy band so placeholders never raise alerts.

use crate::thresholds::classify;
use chrono::{DateTime, Utc};
use verdant_schemas::{
    sensor::{PlantId, SensorKind, SensorReading},
    threshold::Thresholds,
};

pub fn placeholder_readings(
    plant_id: &PlantId,
    thresholds: &Thresholds,
    now: DateTime<Utc>,
) -> Vec<SensorReading> {
    tracing::debug!(plant = %plant_id, "generating placeholder readings");
    SensorKind::ALL
        .iter()
        .map(|&kind| {
            let value = thresholds.band(kind).midpoint();
            SensorReading {
                plant_id: Some(plant_id.clone()),
                kind,
                value: Some(value),
                status: classify(thresholds, kind, value),
                timestamp: Some(now),
            }
        })
        .collect()
}
