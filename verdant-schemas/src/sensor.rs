//! Sensor readings as they arrive from the backend and as the rest of the
//! workspace sees them once normalized.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of sensors a plant can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    SoilMoisture,
    Temperature,
    Light,
    Humidity,
}

impl SensorKind {
    pub const ALL: [SensorKind; 4] = [
        SensorKind::Temperature,
        SensorKind::Humidity,
        SensorKind::SoilMoisture,
        SensorKind::Light,
    ];

    /// The wire name used by the backend (`soil_moisture`, `light`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::SoilMoisture => "soil_moisture",
            SensorKind::Temperature => "temperature",
            SensorKind::Light => "light",
            SensorKind::Humidity => "humidity",
        }
    }

    /// Short human-readable label for dashboards.
    pub fn label(&self) -> &'static str {
        match self {
            SensorKind::SoilMoisture => "Moisture",
            SensorKind::Temperature => "Temperature",
            SensorKind::Light => "Light",
            SensorKind::Humidity => "Humidity",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            SensorKind::SoilMoisture | SensorKind::Humidity => "%",
            SensorKind::Temperature => "°C",
            SensorKind::Light => "lx",
        }
    }

    /// The manual care action offered when this sensor needs attention.
    pub fn care_action(&self) -> &'static str {
        match self {
            SensorKind::SoilMoisture => "Water Plant",
            SensorKind::Temperature => "Adjust Temp",
            SensorKind::Light => "Add Light",
            SensorKind::Humidity => "Humidify",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name one of the known sensor kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSensorKind(pub String);

impl fmt::Display for UnknownSensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sensor kind '{}'", self.0)
    }
}

impl std::error::Error for UnknownSensorKind {}

impl FromStr for SensorKind {
    type Err = UnknownSensorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "soil_moisture" => Ok(SensorKind::SoilMoisture),
            "temperature" => Ok(SensorKind::Temperature),
            "light" => Ok(SensorKind::Light),
            "humidity" => Ok(SensorKind::Humidity),
            other => Err(UnknownSensorKind(other.to_string())),
        }
    }
}

/// Per-reading status, computed upstream from the sensor's thresholds.
///
/// Statuses outside `OK`/`LOW`/`CRITICAL` are kept verbatim so the overall
/// status can report them as unknown instead of silently treating them as
/// healthy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SensorStatus {
    #[default]
    Ok,
    Low,
    Critical,
    Unrecognized(String),
}

impl SensorStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SensorStatus::Ok => "OK",
            SensorStatus::Low => "LOW",
            SensorStatus::Critical => "CRITICAL",
            SensorStatus::Unrecognized(other) => other,
        }
    }
}

impl From<String> for SensorStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "OK" => SensorStatus::Ok,
            "LOW" => SensorStatus::Low,
            "CRITICAL" => SensorStatus::Critical,
            _ => SensorStatus::Unrecognized(value),
        }
    }
}

impl From<&str> for SensorStatus {
    fn from(value: &str) -> Self {
        SensorStatus::from(value.to_string())
    }
}

impl From<SensorStatus> for String {
    fn from(status: SensorStatus) -> Self {
        match status {
            SensorStatus::Unrecognized(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single severity summary for a plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverallStatus {
    Ok,
    Low,
    Critical,
    Unknown,
}

impl OverallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallStatus::Ok => "OK",
            OverallStatus::Low => "LOW",
            OverallStatus::Critical => "CRITICAL",
            OverallStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque plant identifier. The backend sends either strings or integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "PlantIdRepr", into = "String")]
pub struct PlantId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum PlantIdRepr {
    Text(String),
    Integer(i64),
}

impl From<PlantIdRepr> for PlantId {
    fn from(repr: PlantIdRepr) -> Self {
        match repr {
            PlantIdRepr::Text(s) => PlantId(s),
            PlantIdRepr::Integer(n) => PlantId(n.to_string()),
        }
    }
}

impl PlantId {
    pub fn new(id: impl Into<String>) -> Self {
        PlantId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<PlantId> for String {
    fn from(id: PlantId) -> Self {
        id.0
    }
}

impl From<&str> for PlantId {
    fn from(id: &str) -> Self {
        PlantId(id.to_string())
    }
}

impl fmt::Display for PlantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A measurement that may arrive as a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericValue {
    Number(f64),
    Text(String),
}

impl NumericValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumericValue::Number(n) if n.is_finite() => Some(*n),
            NumericValue::Number(_) => None,
            NumericValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }
}

/// One reading exactly as the backend delivers it.
///
/// Every field is optional; older endpoints name the kind `sensor_type`
/// instead of `type`, and timestamps may be ISO strings or epoch
/// milliseconds. Decoding only fails for rows that are not JSON objects: a
/// field of the wrong shape reads as absent, so it can never hide the rest of
/// the reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Map<String, serde_json::Value>")]
pub struct RawSensorReading {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_id: Option<PlantId>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<NumericValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<serde_json::Value>,
}

impl From<serde_json::Map<String, serde_json::Value>> for RawSensorReading {
    fn from(row: serde_json::Map<String, serde_json::Value>) -> Self {
        let plant_id = ["plant_id", "plantId"]
            .iter()
            .filter_map(|key| row.get(*key))
            .find_map(|v| PlantId::deserialize(v).ok());
        let text = |v: Option<&serde_json::Value>| v.and_then(|v| v.as_str()).map(str::to_string);

        RawSensorReading {
            plant_id,
            kind: text(row.get("type")),
            sensor_type: text(row.get("sensor_type")),
            value: row.get("value").and_then(|v| NumericValue::deserialize(v).ok()),
            // Non-string statuses are kept as their JSON text so they count as
            // unrecognized rather than healthy.
            status: match row.get("status") {
                None | Some(serde_json::Value::Null) => None,
                Some(serde_json::Value::String(s)) => Some(s.clone()),
                Some(other) => Some(other.to_string()),
            },
            timestamp: row.get("timestamp").filter(|v| !v.is_null()).cloned(),
        }
    }
}

/// A reading after normalization: recognized kind, defaulted status and a
/// parsed timestamp (absent when the source value could not be read).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant_id: Option<PlantId>,
    #[serde(rename = "type")]
    pub kind: SensorKind,
    pub value: Option<f64>,
    pub status: SensorStatus,
    pub timestamp: Option<DateTime<Utc>>,
}
