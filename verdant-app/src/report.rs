//! Plain-text rendering of aggregation results.

use std::fmt::Write;
use verdant_core::{
    aggregator::LatestByType,
    health::{gauge_percent, GardenSummary, PlantHealth},
};
use verdant_schemas::sensor::{OverallStatus, SensorReading, SensorStatus};

const GAUGE_WIDTH: usize = 10;

fn format_value(reading: &SensorReading) -> String {
    match reading.value {
        Some(v) => format!("{:.1} {}", v, reading.kind.unit()),
        None => "—".to_string(),
    }
}

fn gauge(reading: &SensorReading) -> String {
    let filled = (gauge_percent(reading.value) / 100.0 * GAUGE_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(GAUGE_WIDTH - filled))
}

/// One line per sensor kind followed by the overall status.
pub fn render_status(latest: &LatestByType, overall: OverallStatus) -> String {
    let mut out = String::new();
    if latest.is_empty() {
        out.push_str("No sensor readings available.\n");
    }
    for reading in latest.values() {
        let when = reading
            .timestamp
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown time".to_string());
        let _ = write!(
            out,
            "  - {:<12} {:>12} {} {:<8} ({})",
            reading.kind.label(),
            format_value(reading),
            gauge(reading),
            reading.status,
            when
        );
        if matches!(reading.status, SensorStatus::Low | SensorStatus::Critical) {
            let _ = write!(out, " -> {}", reading.kind.care_action());
        }
        out.push('\n');
    }
    let _ = writeln!(out, "Overall status: {}", overall);
    out
}

/// A dashboard line per plant and the garden-wide counts.
pub fn render_dashboard(plants: &[PlantHealth], summary: &GardenSummary) -> String {
    let mut out = String::new();
    out.push_str("========================================\n");
    let _ = writeln!(out, "Garden overview: {} plants", summary.total);
    let _ = writeln!(
        out,
        "  OK: {}  LOW: {}  CRITICAL: {}  UNKNOWN: {}",
        summary.ok, summary.low, summary.critical, summary.unknown
    );
    out.push_str("----------------------------------------\n");

    for plant in plants {
        let name = if plant.plant_name.is_empty() {
            plant.plant_id.as_str()
        } else {
            plant.plant_name.as_str()
        };
        let _ = writeln!(
            out,
            "{} [{}] {} ({}: {}) overall {}",
            name,
            plant.plant_type.as_deref().unwrap_or("unknown type"),
            plant.badge(),
            plant.pivot.label(),
            plant.pivot_status,
            plant.overall
        );
        for (kind, status) in plant.attention_needed() {
            let _ = writeln!(out, "    ! {} is {}: {}", kind.label(), status, kind.care_action());
        }
        if let Some(at) = plant.last_action_at {
            let _ = writeln!(out, "    last care action: {}", at.format("%Y-%m-%d %H:%M"));
        }
    }
    out.push_str("========================================\n");
    out
}
