//! Charts of a plant's reading history.

use anyhow::Result;
use chrono::{DateTime, Utc};
use plotters::prelude::*;
use verdant_schemas::{
    sensor::{SensorKind, SensorReading},
    threshold::Thresholds,
};

/// Points of one sensor series, as hours since the first reading.
fn series(readings: &[SensorReading], kind: SensorKind, origin: DateTime<Utc>) -> Vec<(f64, f64)> {
    let mut points: Vec<(f64, f64)> = readings
        .iter()
        .filter(|r| r.kind == kind)
        .filter_map(|r| {
            let at = r.timestamp?;
            let value = r.value?;
            Some(((at - origin).num_seconds() as f64 / 3600.0, value))
        })
        .collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    points
}

/// Draws a 2x2 grid, one panel per sensor kind, with the healthy band shown
/// as dashed lines. Readings without a timestamp or value are left out.
pub fn plot_history(
    out_path: &str,
    plant_label: &str,
    readings: &[SensorReading],
    thresholds: &Thresholds,
) -> Result<()> {
    let Some(origin) = readings.iter().filter_map(|r| r.timestamp).min() else {
        println!("[Plotting] Warning: No timestamped readings to plot.");
        return Ok(());
    };

    let root = BitMapBackend::new(out_path, (1280, 960)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(&format!("Sensor history: {}", plant_label), ("sans-serif", 40))?;
    let panels = root.split_evenly((2, 2));
    let colors = [RED, BLUE, GREEN, MAGENTA];

    for ((panel, kind), color) in panels.iter().zip(SensorKind::ALL).zip(colors) {
        let points = series(readings, kind, origin);
        let band = thresholds.band(kind);

        let max_x = points.last().map_or(1.0, |p| p.0.max(1.0));
        let (min_y, max_y) = points.iter().fold((band.low, band.high), |(lo, hi), p| {
            (lo.min(p.1), hi.max(p.1))
        });
        let margin = ((max_y - min_y) * 0.1).max(1.0);

        let mut chart = ChartBuilder::on(panel)
            .caption(
                format!("{} ({})", kind.label(), kind.unit()),
                ("sans-serif", 24).into_font(),
            )
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(0f64..max_x, (min_y - margin)..(max_y + margin))?;

        chart
            .configure_mesh()
            .x_desc("Time (hours)")
            .y_desc(kind.unit())
            .draw()?;

        for bound in [band.low, band.high] {
            chart.draw_series(DashedLineSeries::new(
                vec![(0.0, bound), (max_x, bound)],
                6,
                4,
                BLACK.mix(0.5).stroke_width(1),
            ))?;
        }

        chart.draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?;
        chart.draw_series(points.iter().map(|p| Circle::new(*p, 3, color.filled())))?;
    }

    root.present()?;
    println!("[Plotting] Sensor history saved to '{}'.", out_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use verdant_schemas::sensor::SensorStatus;

    fn at(hour: u32, kind: SensorKind, value: Option<f64>) -> SensorReading {
        SensorReading {
            plant_id: None,
            kind,
            value,
            status: SensorStatus::Ok,
            timestamp: Some(Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()),
        }
    }

    #[test]
    fn series_is_sorted_and_filtered() {
        let origin = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let readings = vec![
            at(6, SensorKind::Light, Some(400.0)),
            at(2, SensorKind::Light, Some(100.0)),
            at(3, SensorKind::Light, None),
            at(4, SensorKind::Humidity, Some(50.0)),
        ];
        assert_eq!(
            series(&readings, SensorKind::Light, origin),
            vec![(2.0, 100.0), (6.0, 400.0)]
        );
    }
}
