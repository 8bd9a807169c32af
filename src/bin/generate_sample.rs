//! Generate a sample device log for demos and manual testing.
//!
//! Writes `esp32_data.csv` in the firmware's on-device format (the full
//! seven-column header, including the columns the dashboard ignores),
//! covering one simulated summer day at five-minute intervals.

use std::f64::consts::PI;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Timelike};

const DARK_ADC: f64 = 4095.0;
const BRIGHT_IRRADIANCE: f64 = 1000.0;

/// Minimal deterministic PRNG (splitmix64).
struct SimpleRng(u64);

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng(seed)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

/// Same inverted linear curve the firmware logs with.
fn irradiance(light_raw: i64) -> f64 {
    ((DARK_ADC - light_raw as f64) / DARK_ADC * BRIGHT_IRRADIANCE).clamp(0.0, BRIGHT_IRRADIANCE)
}

fn soil_status(soil_raw: i64) -> &'static str {
    if soil_raw > 2500 {
        "trocken"
    } else if soil_raw > 1700 {
        "feucht"
    } else {
        "nass"
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(7);

    let midnight = NaiveDate::from_ymd_opt(2024, 6, 15)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("building start of day")?;

    let mut writer =
        csv::Writer::from_path("esp32_data.csv").context("creating esp32_data.csv")?;
    writer.write_record([
        "Zeitstempel",
        "Bodenfeuchte-Rohwert",
        "Bodenstatus",
        "Licht-Rohwert",
        "Lichtintensitaet(W/m2)",
        "Temperatur(C)",
        "Luftfeuchtigkeit(%)",
    ])?;

    // One reading every five minutes for a day.
    for step in 0..288i64 {
        let ts = midnight + Duration::minutes(5 * step);
        let hour = ts.hour() as f64 + ts.minute() as f64 / 60.0;

        // Daylight between roughly 06:00 and 21:00, peaking mid-day.
        let sun = (((hour - 6.0) / 15.0) * PI).sin().max(0.0);

        let light_raw = (DARK_ADC - sun * 3900.0 + rng.gauss(0.0, 60.0))
            .clamp(0.0, DARK_ADC) as i64;
        let soil_raw = (1600.0 + step as f64 * 1.2 + rng.gauss(0.0, 15.0)).max(0.0) as i64;
        let temperature = 14.0 + sun * 12.0 + rng.gauss(0.0, 0.4);
        let humidity = (78.0 - sun * 30.0 + rng.gauss(0.0, 2.0)).clamp(20.0, 100.0);

        writer.write_record([
            ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            soil_raw.to_string(),
            soil_status(soil_raw).to_string(),
            light_raw.to_string(),
            format!("{:.1}", irradiance(light_raw)),
            format!("{temperature:.1}"),
            format!("{humidity:.1}"),
        ])?;
    }

    writer.flush().context("writing esp32_data.csv")?;
    println!("wrote esp32_data.csv (288 readings)");
    Ok(())
}
