//! CSV batch projection.
//!
//! Input rows carry `latitude,longitude[,name]`. The output starts with a
//! block of `# ` statistics lines followed by the input columns plus
//! `easting,northing`.

use std::io::Read;
use std::time::Instant;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::projection::project_many;
use crate::types::{GeographicCoordinate, ProjectedCoordinate};

/// Written instead of grid values when a row could not be projected
pub const FAILED_MARKER: &str = "PROJECTION_FAILED";

#[derive(Debug, Deserialize)]
pub struct CsvPoint {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub name: Option<String>,
}

/// Counters reported in the output header
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchStats {
    pub total: usize,
    pub successful: usize,
    pub skipped_rows: usize,
    pub execution_time_ms: f64,
}

impl BatchStats {
    pub fn failed(&self) -> usize {
        self.total - self.successful
    }

    pub fn points_per_second(&self) -> f64 {
        if self.execution_time_ms > 0.0 {
            (self.successful as f64 * 1000.0 / self.execution_time_ms).round()
        } else {
            0.0
        }
    }
}

/// Result of a batch run: the rendered CSV and its counters
#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub csv: String,
    pub stats: BatchStats,
}

/// Reads points from `input`, projects them in parallel and renders the result.
///
/// Rows that cannot be parsed are skipped and counted; rows whose projection
/// fails are kept with [`FAILED_MARKER`] in both grid columns. A read error
/// from `input` aborts the batch with [`Error::Csv`].
pub fn project_csv<R: Read>(input: R, start: Instant) -> Result<BatchOutput> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);

    let mut points: Vec<CsvPoint> = Vec::new();
    let mut skipped_rows = 0;
    for (line, result) in reader.deserialize::<CsvPoint>().enumerate() {
        match result {
            Ok(point) => points.push(point),
            Err(e) if e.is_io_error() => return Err(Error::Csv(e)),
            Err(e) => {
                warn!(row = line + 1, error = %e, "skipping unreadable CSV row");
                skipped_rows += 1;
            }
        }
    }

    let coords: Vec<GeographicCoordinate> = points
        .iter()
        .map(|p| GeographicCoordinate::new(p.latitude, p.longitude))
        .collect();
    let projected = project_many(&coords);

    let successful = projected.iter().filter(|p| !p.is_sentinel()).count();
    let stats = BatchStats {
        total: points.len(),
        successful,
        skipped_rows,
        execution_time_ms: start.elapsed().as_secs_f64() * 1000.0,
    };
    info!(
        total = stats.total,
        successful = stats.successful,
        skipped = stats.skipped_rows,
        "batch projected"
    );

    let csv = render(&points, &projected, &stats)?;
    Ok(BatchOutput { csv, stats })
}

fn render(points: &[CsvPoint], projected: &[ProjectedCoordinate], stats: &BatchStats) -> Result<String> {
    let mut out = String::with_capacity(points.len() * 48 + 192);

    out.push_str("# Statistics\n");
    out.push_str(&format!("# Total points: {}\n", stats.total));
    out.push_str(&format!("# Successful: {}\n", stats.successful));
    out.push_str(&format!("# Failed: {}\n", stats.failed()));
    out.push_str(&format!("# Skipped rows: {}\n", stats.skipped_rows));
    out.push_str(&format!("# Execution time: {:.2} ms\n", stats.execution_time_ms));
    out.push_str(&format!("# Points per second: {:.0}\n", stats.points_per_second()));

    let has_names = points.iter().any(|p| p.name.is_some());
    let mut writer = csv::Writer::from_writer(Vec::with_capacity(points.len() * 48));
    if has_names {
        writer.write_record(["latitude", "longitude", "name", "easting", "northing"])?;
    } else {
        writer.write_record(["latitude", "longitude", "easting", "northing"])?;
    }

    for (point, grid) in points.iter().zip(projected) {
        let (easting, northing) = if grid.is_sentinel() {
            (FAILED_MARKER.to_string(), FAILED_MARKER.to_string())
        } else {
            (format!("{:.2}", grid.easting), format!("{:.2}", grid.northing))
        };

        let latitude = point.latitude.to_string();
        let longitude = point.longitude.to_string();
        if has_names {
            let name = point.name.as_deref().unwrap_or("");
            writer.write_record([
                latitude.as_str(),
                longitude.as_str(),
                name,
                easting.as_str(),
                northing.as_str(),
            ])?;
        } else {
            writer.write_record([
                latitude.as_str(),
                longitude.as_str(),
                easting.as_str(),
                northing.as_str(),
            ])?;
        }
    }

    let body = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    out.push_str(&String::from_utf8_lossy(&body));
    Ok(out)
}
