use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use thiserror::Error;

use super::calibration::Calibration;
use super::model::{Dataset, SensorReading};

// ---------------------------------------------------------------------------
// Device log schema
// ---------------------------------------------------------------------------

pub const COL_TIMESTAMP: &str = "Zeitstempel";
pub const COL_SOIL_RAW: &str = "Bodenfeuchte-Rohwert";
pub const COL_LIGHT_RAW: &str = "Licht-Rohwert";
pub const COL_TEMPERATURE: &str = "Temperatur(C)";
pub const COL_HUMIDITY: &str = "Luftfeuchtigkeit(%)";

/// Columns a device log must contain. The firmware writes two more
/// (`Bodenstatus` and its own irradiance column); those are ignored and the
/// irradiance shown in the UI is always recomputed from `Licht-Rohwert`.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    COL_TIMESTAMP,
    COL_SOIL_RAW,
    COL_LIGHT_RAW,
    COL_TEMPERATURE,
    COL_HUMIDITY,
];

/// Accepted timestamp layouts, tried in order. The firmware logs the first
/// form; the rest cover hand-edited or re-exported files.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
];

/// How many raw timestamp strings to keep for the parse-failure diagnostic.
const PREVIEW_ROWS: usize = 5;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file '{}' not found, download it from the device first", .0.display())]
    MissingFile(PathBuf),

    #[error("data file contains no rows")]
    EmptyFile,

    #[error("CSV is missing required column(s) {missing:?}; a device log contains {REQUIRED_COLUMNS:?}")]
    SchemaMismatch { missing: Vec<String> },

    #[error("'{COL_TIMESTAMP}' column could not be parsed; first values: {preview:?}")]
    TimestampParse { preview: Vec<String> },

    #[error("no rows with a valid timestamp remain")]
    EmptyAfterClean,

    #[error("reading data file: {0}")]
    Io(#[from] io::Error),

    #[error("reading CSV: {0}")]
    Csv(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// One record after field parsing, before the invalid-timestamp drop.
struct ParsedRow {
    timestamp: Option<NaiveDateTime>,
    soil_moisture_raw: i64,
    light_raw: i64,
    temperature_c: f64,
    humidity_pct: f64,
}

/// Load and prepare the device log at `path`.
///
/// Pipeline: schema check → per-row parse (invalid rows logged and
/// dropped) → irradiance derivation → drop rows without a timestamp →
/// stable sort ascending by timestamp.
pub fn load_dataset(path: &Path, calibration: &Calibration) -> Result<Dataset, LoadError> {
    let meta = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(LoadError::MissingFile(path.to_path_buf()));
        }
        Err(e) => return Err(LoadError::Io(e)),
    };
    if meta.len() == 0 {
        return Err(LoadError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    // Schema check runs on the header alone, before any row is parsed.
    let headers = reader.headers()?.clone();
    let [ts_idx, soil_idx, light_idx, temp_idx, hum_idx] = column_indices(&headers)?;

    let mut rows: Vec<ParsedRow> = Vec::new();
    let mut raw_count = 0usize;
    let mut bad_timestamps: Vec<String> = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        raw_count += 1;

        let raw_ts = record.get(ts_idx).unwrap_or("");
        let timestamp = parse_timestamp(raw_ts);
        if timestamp.is_none() && bad_timestamps.len() < PREVIEW_ROWS {
            bad_timestamps.push(raw_ts.to_string());
        }

        let soil = parse_cell::<i64>(&record, soil_idx);
        let light = parse_cell::<i64>(&record, light_idx);
        let temp = parse_cell::<f64>(&record, temp_idx);
        let hum = parse_cell::<f64>(&record, hum_idx);

        match (soil, light, temp, hum) {
            (Some(soil_moisture_raw), Some(light_raw), Some(temperature_c), Some(humidity_pct)) => {
                rows.push(ParsedRow {
                    timestamp,
                    soil_moisture_raw,
                    light_raw,
                    temperature_c,
                    humidity_pct,
                });
            }
            _ => {
                // Header is line 1, so the first data row is line 2.
                log::warn!("dropping line {}: unparseable numeric cell", row_no + 2);
            }
        }
    }

    if raw_count == 0 {
        return Err(LoadError::EmptyFile);
    }
    if !rows.is_empty() && rows.iter().all(|r| r.timestamp.is_none()) {
        return Err(LoadError::TimestampParse {
            preview: bad_timestamps,
        });
    }

    // Derive irradiance for every parsed row, then drop the timestamp-less
    // ones. Derivation happens first so dropped rows never shift it.
    let readings: Vec<SensorReading> = rows
        .into_iter()
        .map(|row| {
            let irradiance_w_m2 = calibration.to_irradiance(row.light_raw);
            (row, irradiance_w_m2)
        })
        .filter_map(|(row, irradiance_w_m2)| {
            row.timestamp.map(|timestamp| SensorReading {
                timestamp,
                soil_moisture_raw: row.soil_moisture_raw,
                light_raw: row.light_raw,
                temperature_c: row.temperature_c,
                humidity_pct: row.humidity_pct,
                irradiance_w_m2,
            })
        })
        .collect();

    let dataset = Dataset::from_readings(readings);
    if dataset.is_empty() {
        return Err(LoadError::EmptyAfterClean);
    }
    Ok(dataset)
}

/// Locate the required columns in the header row.
fn column_indices(headers: &csv::StringRecord) -> Result<[usize; 5], LoadError> {
    let mut indices = [0usize; 5];
    let mut missing = Vec::new();
    for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        match headers.iter().position(|h| h == name) {
            Some(i) => *slot = i,
            None => missing.push(name.to_string()),
        }
    }
    if missing.is_empty() {
        Ok(indices)
    } else {
        Err(LoadError::SchemaMismatch { missing })
    }
}

fn parse_cell<T: std::str::FromStr>(record: &csv::StringRecord, idx: usize) -> Option<T> {
    record.get(idx).and_then(|s| s.parse::<T>().ok())
}

/// Parse a device timestamp, trying each accepted layout in order.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}
