use serde::Deserialize;

/// A reading dump on disk. Accepts a bare array, the backend's
/// `{ "data": [...] }` envelope, or a versioned `{ "readings": [...] }` file.
///
/// Rows stay as loose JSON values so a single malformed row can be skipped
/// without rejecting the whole file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ReadingFile {
    Bare(Vec<serde_json::Value>),
    Envelope {
        data: Vec<serde_json::Value>,
    },
    Versioned {
        schema_version: Option<String>,
        readings: Vec<serde_json::Value>,
    },
}

impl ReadingFile {
    pub fn into_rows(self) -> Vec<serde_json::Value> {
        match self {
            ReadingFile::Bare(rows) => rows,
            ReadingFile::Envelope { data } => data,
            ReadingFile::Versioned { readings, .. } => readings,
        }
    }
}

/// The `/plants-with-sensors` payload. Plants are decoded one by one later
/// so a malformed entry only drops that plant.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PlantsPayload {
    Envelope {
        #[serde(default)]
        data: Vec<serde_json::Value>,
    },
    Bare(Vec<serde_json::Value>),
}

impl PlantsPayload {
    pub fn into_rows(self) -> Vec<serde_json::Value> {
        match self {
            PlantsPayload::Envelope { data } => data,
            PlantsPayload::Bare(rows) => rows,
        }
    }
}
