use crate::{
    aggregator::{build_latest_by_type, overall_status_from_latest, Fallback, LatestByType},
    normalize::{decode_rows, parse_timestamp},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use verdant_schemas::{
    plant::PlantWithSensors,
    sensor::{OverallStatus, PlantId, SensorKind, SensorStatus},
    threshold::Thresholds,
};

/// Everything a plant card needs: latest readings, overall status and the
/// badge driven by the plant's pivot sensor.
#[derive(Debug, Clone, Serialize)]
pub struct PlantHealth {
    pub plant_id: PlantId,
    pub plant_name: String,
    pub plant_type: Option<String>,
    pub latest: LatestByType,
    pub overall: OverallStatus,
    pub pivot: SensorKind,
    pub pivot_status: SensorStatus,
    pub last_action_at: Option<DateTime<Utc>>,
}

impl PlantHealth {
    /// Aggregates one plant. `placeholders` enables synthetic readings for
    /// plants that have none.
    pub fn from_plant(
        plant: &PlantWithSensors,
        placeholders: Option<&Thresholds>,
        now: DateTime<Utc>,
    ) -> Self {
        let raw = decode_rows(&plant.sensors);
        let fallback = match placeholders {
            Some(thresholds) => Fallback::Placeholder {
                plant_id: &plant.plant_id,
                thresholds,
                now,
            },
            None => Fallback::None,
        };
        let latest = build_latest_by_type(&raw, fallback);
        let overall = overall_status_from_latest(&latest);
        let pivot = plant.pivot_sensor();
        let pivot_status = latest
            .get(&pivot)
            .map(|r| r.status.clone())
            .unwrap_or_default();

        Self {
            plant_id: plant.plant_id.clone(),
            plant_name: plant.plant_name.clone(),
            plant_type: plant.plant_type.clone(),
            latest,
            overall,
            pivot,
            pivot_status,
            last_action_at: plant.last_action_at.as_ref().and_then(parse_timestamp),
        }
    }

    pub fn badge(&self) -> &'static str {
        badge_label(&self.pivot_status)
    }

    /// Sensors whose latest reading needs a care action, most severe first.
    pub fn attention_needed(&self) -> Vec<(SensorKind, &SensorStatus)> {
        let mut alerts: Vec<_> = self
            .latest
            .iter()
            .filter(|(_, r)| matches!(r.status, SensorStatus::Low | SensorStatus::Critical))
            .map(|(kind, r)| (*kind, &r.status))
            .collect();
        alerts.sort_by_key(|(_, status)| !matches!(status, SensorStatus::Critical));
        alerts
    }
}

/// Badge text for a pivot status. Unrecognized statuses fall back to the
/// healthy badge.
pub fn badge_label(status: &SensorStatus) -> &'static str {
    match status {
        SensorStatus::Low => "Attention",
        SensorStatus::Critical => "Alerte",
        SensorStatus::Ok | SensorStatus::Unrecognized(_) => "Excellent",
    }
}

/// Width of a sensor gauge, in percent. Missing values draw an empty bar.
pub fn gauge_percent(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v.clamp(0.0, 100.0),
        _ => 0.0,
    }
}

/// Plant counts per overall status across a garden.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GardenSummary {
    pub total: usize,
    pub ok: usize,
    pub low: usize,
    pub critical: usize,
    pub unknown: usize,
}

impl GardenSummary {
    pub fn from_plants(plants: &[PlantHealth]) -> Self {
        let mut summary = GardenSummary::default();
        for plant in plants {
            summary.total += 1;
            match plant.overall {
                OverallStatus::Ok => summary.ok += 1,
                OverallStatus::Low => summary.low += 1,
                OverallStatus::Critical => summary.critical += 1,
                OverallStatus::Unknown => summary.unknown += 1,
            }
        }
        summary
    }
}
