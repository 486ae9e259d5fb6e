use crate::sensor::SensorKind;
use serde::{Deserialize, Serialize};

/// Healthy band for one sensor kind. Values below `low` are `LOW`, values
/// above `high` are `CRITICAL`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }
}

/// Healthy bands for every sensor kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub temperature: Band,
    pub humidity: Band,
    pub soil_moisture: Band,
    pub light: Band,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            temperature: Band::new(18.0, 30.0),
            humidity: Band::new(40.0, 70.0),
            soil_moisture: Band::new(25.0, 60.0),
            light: Band::new(200.0, 800.0),
        }
    }
}

impl Thresholds {
    pub fn band(&self, kind: SensorKind) -> Band {
        match kind {
            SensorKind::Temperature => self.temperature,
            SensorKind::Humidity => self.humidity,
            SensorKind::SoilMoisture => self.soil_moisture,
            SensorKind::Light => self.light,
        }
    }
}
