//! The sensor aggregator: latest reading per sensor kind, and a single
//! overall status derived from those latest readings.

use crate::{normalize::normalize_reading, placeholder::placeholder_readings};
use chrono::{DateTime, Utc};
use std::collections::{btree_map::Entry, BTreeMap};
use verdant_schemas::{
    sensor::{OverallStatus, PlantId, RawSensorReading, SensorKind, SensorReading, SensorStatus},
    threshold::Thresholds,
};

/// The most recent reading of each sensor kind.
pub type LatestByType = BTreeMap<SensorKind, SensorReading>;

/// What to aggregate when a plant has no readings at all.
#[derive(Debug, Clone, Copy, Default)]
pub enum Fallback<'a> {
    /// Return an empty map.
    #[default]
    None,
    /// Synthesize one healthy placeholder reading per kind.
    Placeholder {
        plant_id: &'a PlantId,
        thresholds: &'a Thresholds,
        now: DateTime<Utc>,
    },
}

/// Selects the latest reading per kind from raw backend readings.
///
/// Readings without a recognizable kind are dropped. When `readings` is empty
/// the result depends on `fallback`.
pub fn build_latest_by_type(readings: &[RawSensorReading], fallback: Fallback<'_>) -> LatestByType {
    if readings.is_empty() {
        return match fallback {
            Fallback::None => LatestByType::new(),
            Fallback::Placeholder {
                plant_id,
                thresholds,
                now,
            } => latest_by_type(placeholder_readings(plant_id, thresholds, now)),
        };
    }
    latest_by_type(readings.iter().filter_map(normalize_reading))
}

/// Selects the latest reading per kind from already normalized readings.
///
/// A reading replaces the current pick only when its timestamp is strictly
/// later, so on equal timestamps the first one in input order is kept. A
/// reading with a timestamp always beats one without.
pub fn latest_by_type<I>(readings: I) -> LatestByType
where
    I: IntoIterator<Item = SensorReading>,
{
    let mut latest = LatestByType::new();
    for reading in readings {
        match latest.entry(reading.kind) {
            Entry::Vacant(slot) => {
                slot.insert(reading);
            }
            Entry::Occupied(mut slot) => {
                if is_newer(&reading, slot.get()) {
                    slot.insert(reading);
                }
            }
        }
    }
    latest
}

fn is_newer(candidate: &SensorReading, current: &SensorReading) -> bool {
    match (candidate.timestamp, current.timestamp) {
        (Some(candidate), Some(current)) => candidate > current,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Collapses the latest readings into one status.
///
/// Rules, first match wins: no readings is `UNKNOWN`; any `CRITICAL` is
/// `CRITICAL`; any `LOW` is `LOW`; all `OK` is `OK`; anything else (an
/// unrecognized status string) is `UNKNOWN`.
pub fn overall_status_from_latest(latest: &LatestByType) -> OverallStatus {
    if latest.is_empty() {
        return OverallStatus::Unknown;
    }
    let statuses = || latest.values().map(|r| &r.status);

    if statuses().any(|s| *s == SensorStatus::Critical) {
        OverallStatus::Critical
    } else if statuses().any(|s| *s == SensorStatus::Low) {
        OverallStatus::Low
    } else if statuses().all(|s| *s == SensorStatus::Ok) {
        OverallStatus::Ok
    } else {
        OverallStatus::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn raw_list(value: serde_json::Value) -> Vec<RawSensorReading> {
        serde_json::from_value(value).unwrap()
    }

    fn reading(kind: SensorKind, status: &str, day: u32) -> SensorReading {
        SensorReading {
            plant_id: None,
            kind,
            value: Some(day as f64),
            status: SensorStatus::from(status),
            timestamp: Some(Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()),
        }
    }

    fn latest_of(statuses: &[(SensorKind, &str)]) -> LatestByType {
        latest_by_type(statuses.iter().map(|(kind, status)| reading(*kind, status, 1)))
    }

    #[test]
    fn end_to_end_scenario() {
        let readings = raw_list(json!([
            {"type": "soil_moisture", "value": 10, "status": "LOW", "timestamp": "2024-01-01T00:00:00Z"},
            {"type": "soil_moisture", "value": 55, "status": "OK", "timestamp": "2024-01-02T00:00:00Z"},
            {"type": "light", "value": 900, "status": "CRITICAL", "timestamp": "2024-01-01T00:00:00Z"}
        ]));

        let latest = build_latest_by_type(&readings, Fallback::None);
        assert_eq!(latest.len(), 2);

        let moisture = &latest[&SensorKind::SoilMoisture];
        assert_eq!(moisture.value, Some(55.0));
        assert_eq!(moisture.status, SensorStatus::Ok);

        let light = &latest[&SensorKind::Light];
        assert_eq!(light.value, Some(900.0));
        assert_eq!(light.status, SensorStatus::Critical);

        assert_eq!(overall_status_from_latest(&latest), OverallStatus::Critical);
    }

    #[test]
    fn picks_the_maximum_timestamp_regardless_of_order() {
        let readings = vec![
            reading(SensorKind::Temperature, "OK", 3),
            reading(SensorKind::Temperature, "OK", 7),
            reading(SensorKind::Temperature, "OK", 5),
            reading(SensorKind::Temperature, "OK", 1),
        ];
        let latest = latest_by_type(readings);
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[&SensorKind::Temperature].value, Some(7.0));
    }

    #[test]
    fn equal_timestamps_keep_the_first_occurrence() {
        let mut first = reading(SensorKind::Humidity, "OK", 4);
        first.value = Some(40.0);
        let mut second = reading(SensorKind::Humidity, "LOW", 4);
        second.value = Some(20.0);

        let latest = latest_by_type(vec![first, second]);
        assert_eq!(latest[&SensorKind::Humidity].value, Some(40.0));
    }

    #[test]
    fn timestamped_reading_beats_undated_one() {
        let mut undated = reading(SensorKind::Light, "CRITICAL", 1);
        undated.timestamp = None;
        let dated = reading(SensorKind::Light, "OK", 1);

        let latest = latest_by_type(vec![undated.clone(), dated.clone()]);
        assert_eq!(latest[&SensorKind::Light], dated);

        let latest = latest_by_type(vec![dated.clone(), undated]);
        assert_eq!(latest[&SensorKind::Light], dated);
    }

    #[test]
    fn empty_input_without_fallback_is_empty() {
        assert!(build_latest_by_type(&[], Fallback::None).is_empty());
    }

    #[test]
    fn empty_input_with_placeholder_fallback_yields_every_kind() {
        let plant = PlantId::new("p-1");
        let thresholds = Thresholds::default();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

        let latest = build_latest_by_type(
            &[],
            Fallback::Placeholder {
                plant_id: &plant,
                thresholds: &thresholds,
                now,
            },
        );
        assert_eq!(latest.len(), SensorKind::ALL.len());
        assert!(latest.values().all(|r| r.plant_id.as_ref() == Some(&plant)));
        assert_eq!(overall_status_from_latest(&latest), OverallStatus::Ok);
    }

    #[test]
    fn placeholder_is_not_used_when_readings_exist() {
        let plant = PlantId::new("p-1");
        let thresholds = Thresholds::default();
        let readings = raw_list(json!([{"type": "light", "status": "LOW"}]));

        let latest = build_latest_by_type(
            &readings,
            Fallback::Placeholder {
                plant_id: &plant,
                thresholds: &thresholds,
                now: Utc::now(),
            },
        );
        assert_eq!(latest.len(), 1);
        assert_eq!(overall_status_from_latest(&latest), OverallStatus::Low);
    }

    #[test]
    fn unusable_rows_are_dropped_silently() {
        let readings = raw_list(json!([
            {"value": 1},
            {"type": "co2", "status": "CRITICAL"},
            {"sensor_type": "humidity", "status": "OK", "timestamp": "not a date"}
        ]));
        let latest = build_latest_by_type(&readings, Fallback::None);
        assert_eq!(latest.keys().copied().collect::<Vec<_>>(), vec![SensorKind::Humidity]);
        assert_eq!(overall_status_from_latest(&latest), OverallStatus::Ok);
    }

    #[test]
    fn badly_typed_fields_do_not_hide_an_alert() {
        let readings = raw_list(json!([
            {"type": "light", "value": true, "status": "CRITICAL", "timestamp": "2024-01-01T00:00:00Z"},
            {"plant_id": "p-1", "plantId": "p-1", "type": "humidity", "value": 30, "status": "LOW"},
            {"type": "temperature", "value": {"v": 3}, "status": "CRITICAL", "timestamp": 12}
        ]));
        let latest = build_latest_by_type(&readings, Fallback::None);
        assert_eq!(latest.len(), 3);
        assert_eq!(latest[&SensorKind::Light].value, None);
        assert_eq!(overall_status_from_latest(&latest), OverallStatus::Critical);
    }

    #[test]
    fn building_twice_gives_equal_results() {
        let readings = raw_list(json!([
            {"type": "temperature", "value": 22, "status": "OK", "timestamp": "2024-03-01T10:00:00Z"},
            {"type": "temperature", "value": 35, "status": "CRITICAL", "timestamp": "2024-03-01T09:00:00Z"},
            {"type": "humidity", "value": 30, "status": "LOW", "timestamp": "2024-03-01T10:00:00Z"}
        ]));
        assert_eq!(
            build_latest_by_type(&readings, Fallback::None),
            build_latest_by_type(&readings, Fallback::None)
        );
    }

    #[test]
    fn overall_status_of_empty_map_is_unknown() {
        assert_eq!(overall_status_from_latest(&LatestByType::new()), OverallStatus::Unknown);
    }

    #[test]
    fn critical_dominates() {
        let latest = latest_of(&[(SensorKind::Light, "OK"), (SensorKind::Humidity, "CRITICAL")]);
        assert_eq!(overall_status_from_latest(&latest), OverallStatus::Critical);

        let latest = latest_of(&[
            (SensorKind::Light, "LOW"),
            (SensorKind::Humidity, "CRITICAL"),
            (SensorKind::Temperature, "BROKEN"),
        ]);
        assert_eq!(overall_status_from_latest(&latest), OverallStatus::Critical);
    }

    #[test]
    fn low_dominates_ok() {
        let latest = latest_of(&[(SensorKind::Light, "OK"), (SensorKind::Humidity, "LOW")]);
        assert_eq!(overall_status_from_latest(&latest), OverallStatus::Low);
    }

    #[test]
    fn all_ok_is_ok() {
        let latest = latest_of(&[(SensorKind::Light, "OK"), (SensorKind::Humidity, "OK")]);
        assert_eq!(overall_status_from_latest(&latest), OverallStatus::Ok);
    }

    #[test]
    fn unrecognized_status_without_alerts_is_unknown() {
        let latest = latest_of(&[(SensorKind::Light, "OK"), (SensorKind::Humidity, "STALE")]);
        assert_eq!(overall_status_from_latest(&latest), OverallStatus::Unknown);
    }
}
