use crate::config::AppConfig;
use crate::plotting;
use crate::report;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use verdant_core::{
    aggregator::{build_latest_by_type, overall_status_from_latest, Fallback},
    error::VerdantError,
    health::{GardenSummary, PlantHealth},
    loader,
    normalize::{normalize_all, parse_timestamp_str},
    preferences::{FilePreferences, PreferenceStore},
    reading_log::ReadingLog,
    thresholds::classify,
};
use verdant_schemas::sensor::{PlantId, RawSensorReading, SensorKind, SensorReading, SensorStatus};

fn belongs_to(reading: &RawSensorReading, plant: Option<&PlantId>) -> bool {
    match plant {
        Some(plant) => reading.plant_id.as_ref() == Some(plant),
        None => true,
    }
}

/// Aggregates a reading file and prints latest-per-kind and the overall
/// status, or the same as JSON.
pub fn run_status(config: &AppConfig, path: &str, plant: Option<&str>, json: bool) -> Result<()> {
    let plant = plant.map(PlantId::from);
    let readings: Vec<RawSensorReading> = loader::load_readings(path)
        .with_context(|| format!("Failed to load readings from {}", path))?
        .into_iter()
        .filter(|r| belongs_to(r, plant.as_ref()))
        .collect();

    let fallback = match (&plant, config.placeholders) {
        (Some(plant_id), true) => Fallback::Placeholder {
            plant_id,
            thresholds: &config.thresholds,
            now: Utc::now(),
        },
        _ => Fallback::None,
    };

    let latest = build_latest_by_type(&readings, fallback);
    let overall = overall_status_from_latest(&latest);
    tracing::info!(kinds = latest.len(), %overall, "aggregated sensor readings");

    if json {
        let body = serde_json::json!({ "latest_by_type": latest, "overall_status": overall });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        match &plant {
            Some(plant) => println!("--- Sensor status for plant {} ---", plant),
            None => println!("--- Sensor status ---"),
        }
        print!("{}", report::render_status(&latest, overall));
    }
    Ok(())
}

/// Prints one health line per plant of a plants-with-sensors payload. The
/// preference file is only read when restricting to favorites.
pub fn run_dashboard(config: &AppConfig, path: &str, favorites_only: bool) -> Result<()> {
    let plants = loader::load_plants(path)
        .with_context(|| format!("Failed to load plants from {}", path))?;
    let favorites = if favorites_only {
        Some(FilePreferences::open(&config.preferences_path)?)
    } else {
        None
    };
    let placeholders = config.placeholders.then_some(&config.thresholds);
    let now = Utc::now();

    let health: Vec<PlantHealth> = plants
        .iter()
        .filter(|p| favorites.as_ref().map_or(true, |store| store.is_favorite(&p.plant_id)))
        .map(|p| PlantHealth::from_plant(p, placeholders, now))
        .collect();
    let summary = GardenSummary::from_plants(&health);

    print!("{}", report::render_dashboard(&health, &summary));
    Ok(())
}

/// Input for the `record` command.
pub struct RecordRequest<'a> {
    pub log_path: &'a str,
    pub plant: &'a str,
    pub kind: &'a str,
    pub value: f64,
    pub status: Option<&'a str>,
    pub at: Option<&'a str>,
}

/// Builds a reading from command-line input, classifying the value against
/// the configured thresholds when no status is given.
pub fn build_reading(config: &AppConfig, request: &RecordRequest<'_>) -> Result<SensorReading> {
    let kind: SensorKind = request.kind.parse().map_err(VerdantError::from)?;
    let timestamp: DateTime<Utc> = match request.at {
        Some(at) => parse_timestamp_str(at)
            .with_context(|| format!("Could not parse timestamp '{}'", at))?,
        None => Utc::now(),
    };
    let status = match request.status {
        Some(status) => SensorStatus::from(status),
        None => classify(&config.thresholds, kind, request.value),
    };
    Ok(SensorReading {
        plant_id: Some(PlantId::from(request.plant)),
        kind,
        value: Some(request.value),
        status,
        timestamp: Some(timestamp),
    })
}

pub fn run_record(config: &AppConfig, request: RecordRequest<'_>) -> Result<()> {
    let reading = build_reading(config, &request)?;
    let mut log = ReadingLog::open(request.log_path)?;
    log.append(&reading)?;
    println!(
        "Recorded {} = {} for plant {} ({})",
        reading.kind.label(),
        request.value,
        request.plant,
        reading.status
    );
    Ok(())
}

pub fn run_plot(config: &AppConfig, path: &str, plant: &str, out: &str) -> Result<()> {
    let plant_id = PlantId::from(plant);
    let raw: Vec<RawSensorReading> = loader::load_readings(path)
        .with_context(|| format!("Failed to load readings from {}", path))?
        .into_iter()
        .filter(|r| belongs_to(r, Some(&plant_id)))
        .collect();
    let readings = normalize_all(&raw);
    plotting::plot_history(out, plant, &readings, &config.thresholds)
}

pub fn run_toggle_favorite(config: &AppConfig, plant: &str) -> Result<()> {
    let mut store = FilePreferences::open(&config.preferences_path)?;
    let favorite = store.toggle_favorite(&PlantId::from(plant))?;
    if favorite {
        println!("Plant {} added to favorites.", plant);
    } else {
        println!("Plant {} removed from favorites.", plant);
    }
    Ok(())
}

pub fn run_list_favorites(config: &AppConfig) -> Result<()> {
    let store = FilePreferences::open(&config.preferences_path)?;
    let favorites = &store.preferences().favorite_plants;
    if favorites.is_empty() {
        println!("No favorite plants yet.");
    }
    for plant in favorites {
        println!("  - {}", plant);
    }
    Ok(())
}

pub fn run_mark_read(config: &AppConfig, notification: &str) -> Result<()> {
    let mut store = FilePreferences::open(&config.preferences_path)?;
    if store.mark_notification_read(notification)? {
        println!("Notification {} marked as read.", notification);
    } else {
        println!("Notification {} was already read.", notification);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use verdant_core::reading_log::read_log;

    fn request<'a>(log_path: &'a str, kind: &'a str, value: f64) -> RecordRequest<'a> {
        RecordRequest {
            log_path,
            plant: "p-3",
            kind,
            value,
            status: None,
            at: Some("2024-07-01T12:00:00Z"),
        }
    }

    #[test]
    fn record_classifies_missing_status() {
        let config = AppConfig::default();
        let reading = build_reading(&config, &request("unused.csv", "soil_moisture", 10.0)).unwrap();
        assert_eq!(reading.status, SensorStatus::Low);
        assert_eq!(
            reading.timestamp,
            Some(Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn explicit_status_is_kept() {
        let config = AppConfig::default();
        let mut req = request("unused.csv", "light", 10.0);
        req.status = Some("OK");
        assert_eq!(build_reading(&config, &req).unwrap().status, SensorStatus::Ok);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let config = AppConfig::default();
        let err = build_reading(&config, &request("unused.csv", "ph", 6.5)).unwrap_err();
        assert!(err.to_string().contains("Unknown sensor kind 'ph'"));
    }

    #[test]
    fn record_appends_to_the_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");
        let path = path.to_str().unwrap();
        let config = AppConfig::default();

        run_record(&config, request(path, "temperature", 35.0)).unwrap();
        run_record(&config, request(path, "humidity", 50.0)).unwrap();

        let readings = normalize_all(&read_log(path).unwrap());
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].status, SensorStatus::Critical);
        assert_eq!(readings[1].status, SensorStatus::Ok);
    }

    #[test]
    fn favorites_toggle_through_the_preference_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            preferences_path: dir.path().join("prefs.json").display().to_string(),
            ..AppConfig::default()
        };

        run_toggle_favorite(&config, "rose").unwrap();
        let store = FilePreferences::open(&config.preferences_path).unwrap();
        assert!(store.is_favorite(&PlantId::from("rose")));

        run_mark_read(&config, "n-1").unwrap();
        let store = FilePreferences::open(&config.preferences_path).unwrap();
        assert!(store.is_notification_read("n-1"));
        assert!(store.is_favorite(&PlantId::from("rose")));
    }

    #[test]
    fn dashboard_reads_preferences_only_for_favorites() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = dir.path().join("prefs.json");
        std::fs::write(&prefs, "{ not json").unwrap();
        let payload = dir.path().join("plants.json");
        std::fs::write(
            &payload,
            r#"{"data": [{"plant_id": 1, "plant_name": "Fern", "sensors": []}]}"#,
        )
        .unwrap();
        let payload = payload.to_str().unwrap();
        let config = AppConfig {
            preferences_path: prefs.display().to_string(),
            ..AppConfig::default()
        };

        run_dashboard(&config, payload, false).unwrap();
        assert!(run_dashboard(&config, payload, true).is_err());
    }
}
