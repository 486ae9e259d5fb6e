use crate::error::VerdantError;
use csv::{ReaderBuilder, Writer, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::Path;
use verdant_schemas::sensor::{NumericValue, PlantId, RawSensorReading, SensorReading};

/// One row of the CSV reading log.
#[derive(Debug, Serialize, Deserialize)]
struct LogEntry {
    plant_id: String,
    r#type: String,
    value: Option<f64>,
    status: String,
    timestamp: String,
}

impl From<&SensorReading> for LogEntry {
    fn from(reading: &SensorReading) -> Self {
        Self {
            plant_id: reading
                .plant_id
                .as_ref()
                .map(|id| id.as_str().to_string())
                .unwrap_or_default(),
            r#type: reading.kind.as_str().to_string(),
            value: reading.value,
            status: reading.status.as_str().to_string(),
            timestamp: reading.timestamp.map(|t| t.to_rfc3339()).unwrap_or_default(),
        }
    }
}

impl From<LogEntry> for RawSensorReading {
    fn from(entry: LogEntry) -> Self {
        RawSensorReading {
            plant_id: Some(entry.plant_id)
                .filter(|id| !id.is_empty())
                .map(PlantId::new),
            kind: Some(entry.r#type),
            sensor_type: None,
            value: entry.value.map(NumericValue::Number),
            status: Some(entry.status),
            timestamp: Some(serde_json::Value::String(entry.timestamp)),
        }
    }
}

/// Append-only CSV log of sensor readings, flushed after every write.
pub struct ReadingLog {
    path: String,
    writer: Writer<fs::File>,
}

impl ReadingLog {
    /// Opens `path` for appending, writing the header row only when the file
    /// is new or empty.
    pub fn open(path: &str) -> Result<Self, VerdantError> {
        let needs_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| VerdantError::FileIO(path.to_string(), e))?;
        let writer = WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        Ok(Self {
            path: path.to_string(),
            writer,
        })
    }

    pub fn append(&mut self, reading: &SensorReading) -> Result<(), VerdantError> {
        self.writer
            .serialize(LogEntry::from(reading))
            .map_err(|e| VerdantError::CsvError(self.path.clone(), e))?;
        self.writer
            .flush()
            .map_err(|e| VerdantError::FileIO(self.path.clone(), e))?;
        Ok(())
    }
}

/// Reads a reading log back as raw readings. Rows that fail to parse are
/// skipped with a warning; failing to open the file is an error.
pub fn read_log<P: AsRef<Path>>(path: P) -> Result<Vec<RawSensorReading>, VerdantError> {
    let file = path.as_ref().display().to_string();
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path.as_ref())
        .map_err(|e| VerdantError::CsvError(file.clone(), e))?;

    let mut readings = Vec::new();
    for (line, result) in reader.deserialize::<LogEntry>().enumerate() {
        match result {
            Ok(entry) => readings.push(RawSensorReading::from(entry)),
            Err(e) => tracing::warn!(file = %file, row = line + 1, error = %e, "skipping malformed log row"),
        }
    }
    Ok(readings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_all;
    use chrono::{TimeZone, Utc};
    use std::io::Write;
    use verdant_schemas::sensor::{SensorKind, SensorStatus};

    fn sample(kind: SensorKind, value: f64, status: SensorStatus, hour: u32) -> SensorReading {
        SensorReading {
            plant_id: Some(PlantId::new("p-9")),
            kind,
            value: Some(value),
            status,
            timestamp: Some(Utc.with_ymd_and_hms(2024, 2, 1, hour, 0, 0).unwrap()),
        }
    }

    #[test]
    fn appended_readings_read_back_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readings.csv");
        let path = path.to_str().unwrap();

        let first = sample(SensorKind::SoilMoisture, 31.5, SensorStatus::Ok, 8);
        let second = sample(SensorKind::Light, 120.0, SensorStatus::Low, 9);

        ReadingLog::open(path).unwrap().append(&first).unwrap();
        ReadingLog::open(path).unwrap().append(&second).unwrap();

        let contents = fs::read_to_string(path).unwrap();
        assert_eq!(contents.lines().filter(|l| l.starts_with("plant_id")).count(), 1);

        let readings = normalize_all(&read_log(path).unwrap());
        assert_eq!(readings, vec![first, second]);
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readings.csv");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "plant_id,type,value,status,timestamp").unwrap();
        writeln!(file, "p-1,humidity,not-a-number,OK,2024-02-01T00:00:00Z").unwrap();
        writeln!(file, "p-1,humidity,48,OK,2024-02-01T01:00:00Z").unwrap();
        writeln!(file, "p-1,light").unwrap();
        drop(file);

        let readings = read_log(&path).unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].value, Some(NumericValue::Number(48.0)));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_log(dir.path().join("absent.csv")),
            Err(VerdantError::CsvError(..))
        ));
    }
}
