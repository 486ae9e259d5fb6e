//! Turns loosely shaped backend rows into typed readings.
//!
//! Nothing here fails: rows that cannot be decoded, readings without a kind
//! and readings of an unknown kind are dropped and logged, so one bad sensor
//! row never takes a dashboard down.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use verdant_schemas::{
    plant::PlantWithSensors,
    sensor::{RawSensorReading, SensorKind, SensorReading, SensorStatus},
};

/// Decodes each JSON row into a `RawSensorReading`, skipping rows that do not
/// have the expected shape.
pub fn decode_rows(rows: &[serde_json::Value]) -> Vec<RawSensorReading> {
    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| match RawSensorReading::deserialize(row) {
            Ok(raw) => Some(raw),
            Err(e) => {
                tracing::warn!(row = index, error = %e, "skipping malformed sensor row");
                None
            }
        })
        .collect()
}

/// Decodes plant entries one at a time, skipping the ones that do not parse.
pub fn decode_plants(rows: &[serde_json::Value]) -> Vec<PlantWithSensors> {
    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| match PlantWithSensors::deserialize(row) {
            Ok(plant) => Some(plant),
            Err(e) => {
                tracing::warn!(row = index, error = %e, "skipping malformed plant entry");
                None
            }
        })
        .collect()
}

/// Normalizes a single raw reading.
///
/// The kind is read from `type`, falling back to the legacy `sensor_type`
/// key. A missing or empty status counts as `OK`.
pub fn normalize_reading(raw: &RawSensorReading) -> Option<SensorReading> {
    let kind_name = non_empty(raw.kind.as_deref()).or_else(|| non_empty(raw.sensor_type.as_deref()));

    let Some(kind_name) = kind_name else {
        tracing::debug!("dropping reading without a sensor kind");
        return None;
    };

    let kind = match kind_name.parse::<SensorKind>() {
        Ok(kind) => kind,
        Err(e) => {
            tracing::warn!(kind = kind_name, "dropping reading: {}", e);
            return None;
        }
    };

    let status = non_empty(raw.status.as_deref())
        .map(SensorStatus::from)
        .unwrap_or_default();

    Some(SensorReading {
        plant_id: raw.plant_id.clone(),
        kind,
        value: raw.value.as_ref().and_then(|v| v.as_f64()),
        status,
        timestamp: raw.timestamp.as_ref().and_then(parse_timestamp),
    })
}

/// Normalizes every reading, keeping input order.
pub fn normalize_all(raw: &[RawSensorReading]) -> Vec<SensorReading> {
    raw.iter().filter_map(normalize_reading).collect()
}

/// Reads an instant from an RFC 3339 string, a zone-less date-time (taken as
/// UTC), a bare date (UTC midnight) or a number of epoch milliseconds.
pub fn parse_timestamp(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::String(s) => parse_timestamp_str(s),
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

pub fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
