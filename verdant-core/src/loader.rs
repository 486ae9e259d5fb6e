//! Loads reading dumps and plant payloads from disk, dispatching on the file
//! extension.

use crate::{
    error::VerdantError,
    normalize::{decode_plants, decode_rows},
    reading_log::read_log,
};
use serde::de::DeserializeOwned;
use std::{fs, path::Path};
use verdant_schemas::{
    file_formats::{PlantsPayload, ReadingFile},
    plant::PlantWithSensors,
    sensor::RawSensorReading,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
    Csv,
}

fn detect_format(path: &Path) -> Result<Format, VerdantError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("yaml") | Some("yml") => Ok(Format::Yaml),
        Some("csv") => Ok(Format::Csv),
        _ => Err(VerdantError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Reads a structured (JSON or YAML) document into `T`.
fn read_document<T: DeserializeOwned>(path: &Path, format: Format) -> Result<T, VerdantError> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| VerdantError::FileIO(display.clone(), e))?;
    match format {
        Format::Json => Ok(serde_json::from_str(&content)?),
        Format::Yaml => serde_yaml::from_str(&content).map_err(|e| VerdantError::YamlParsing(display, e)),
        Format::Csv => Err(VerdantError::UnsupportedFormat(display)),
    }
}

/// Loads raw readings from a `.json`, `.yaml`/`.yml` or `.csv` file.
///
/// Malformed rows are skipped; only an unreadable or structurally invalid
/// file is an error.
pub fn load_readings<P: AsRef<Path>>(path: P) -> Result<Vec<RawSensorReading>, VerdantError> {
    let path = path.as_ref();
    let readings = match detect_format(path)? {
        Format::Csv => read_log(path)?,
        format => {
            let file: ReadingFile = read_document(path, format)?;
            decode_rows(&file.into_rows())
        }
    };
    tracing::info!(file = %path.display(), count = readings.len(), "loaded sensor readings");
    Ok(readings)
}

/// Loads a plants-with-sensors payload from a `.json` or `.yaml` file.
pub fn load_plants<P: AsRef<Path>>(path: P) -> Result<Vec<PlantWithSensors>, VerdantError> {
    let path = path.as_ref();
    let payload: PlantsPayload = read_document(path, detect_format(path)?)?;
    let plants = decode_plants(&payload.into_rows());
    tracing::info!(file = %path.display(), count = plants.len(), "loaded plants");
    Ok(plants)
}
