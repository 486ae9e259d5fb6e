use crate::sensor::{PlantId, SensorKind};
use serde::{Deserialize, Serialize};

/// A plant as returned by the `/plants-with-sensors` endpoint, with its
/// unprocessed reading history attached.
///
/// Sensor rows are kept as loose JSON so one bad row never rejects the plant.
/// Only `plant_id` is required; the other fields fall back to their defaults
/// when null or of the wrong type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantWithSensors {
    #[serde(alias = "id")]
    pub plant_id: PlantId,
    #[serde(default, deserialize_with = "crate::lenient::or_default")]
    pub plant_name: String,
    #[serde(default, deserialize_with = "crate::lenient::or_default")]
    pub plant_type: Option<String>,
    /// The sensor whose status drives the plant's badge. `soil_moisture`
    /// when not set or not a known sensor.
    #[serde(default, deserialize_with = "crate::lenient::or_default")]
    pub main_sensor: Option<SensorKind>,
    #[serde(default, rename = "lastActionAt", alias = "last_action_at")]
    pub last_action_at: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "crate::lenient::or_default")]
    pub sensors: Vec<serde_json::Value>,
}

impl PlantWithSensors {
    pub fn pivot_sensor(&self) -> SensorKind {
        self.main_sensor.unwrap_or(SensorKind::SoilMoisture)
    }
}
