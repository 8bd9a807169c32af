use chrono::NaiveDateTime;

// ---------------------------------------------------------------------------
// SensorReading – one row of the device log
// ---------------------------------------------------------------------------

/// A single telemetry row as logged by the garden sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    /// Device-local sample time.
    pub timestamp: NaiveDateTime,
    /// Capacitive soil moisture probe, raw ADC code.
    pub soil_moisture_raw: i64,
    /// Photoresistor, raw ADC code (nominally 0–4095).
    pub light_raw: i64,
    /// Air temperature in °C.
    pub temperature_c: f64,
    /// Relative humidity in %.
    pub humidity_pct: f64,
    /// Irradiance in W/m², derived from `light_raw`.
    pub irradiance_w_m2: f64,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded log
// ---------------------------------------------------------------------------

/// The full parsed log, sorted ascending by timestamp.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    readings: Vec<SensorReading>,
}

impl Dataset {
    /// Build a dataset from cleaned readings, sorting by timestamp.
    ///
    /// The sort is stable, so rows sharing a timestamp keep their original
    /// relative order.
    pub fn from_readings(mut readings: Vec<SensorReading>) -> Self {
        readings.sort_by_key(|r| r.timestamp);
        Dataset { readings }
    }

    pub fn readings(&self) -> &[SensorReading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Earliest and latest sample time, if any rows exist.
    pub fn time_bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.readings.first()?.timestamp;
        let last = self.readings.last()?.timestamp;
        Some((first, last))
    }
}

// ---------------------------------------------------------------------------
// TimeWindow – user-selected timestamp interval
// ---------------------------------------------------------------------------

/// An inclusive timestamp interval. For a single-reading dataset the only
/// non-empty window is that reading's own timestamp repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.start <= ts && ts <= self.end
    }
}
