use verdant_schemas::{
    sensor::{SensorKind, SensorStatus},
    threshold::Thresholds,
};

/// Classifies a measured value against the healthy band for its kind.
///
/// Both band edges count as `OK`.
pub fn classify(thresholds: &Thresholds, kind: SensorKind, value: f64) -> SensorStatus {
    let band = thresholds.band(kind);
    if value < band.low {
        SensorStatus::Low
    } else if value > band.high {
        SensorStatus::Critical
    } else {
        SensorStatus::Ok
    }
}
