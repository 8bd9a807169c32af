// ---------------------------------------------------------------------------
// Light sensor calibration
// ---------------------------------------------------------------------------

/// Calibration curve for the photoresistor ADC channel.
///
/// The ESP32 reads the light sensor through a voltage divider, so the raw
/// code is *inverted*: full darkness saturates the ADC at 4095 while direct
/// sunlight pulls it down to 0. Irradiance is recovered by linear
/// interpolation between the two calibration points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// ADC code measured in darkness.
    pub dark_code: i64,
    /// ADC code measured in bright sunlight.
    pub bright_code: i64,
    /// Irradiance at `dark_code`, in W/m².
    pub dark_irradiance: f64,
    /// Irradiance at `bright_code`, in W/m².
    pub bright_irradiance: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Calibration {
            dark_code: 4095,
            bright_code: 0,
            dark_irradiance: 0.0,
            bright_irradiance: 1000.0,
        }
    }
}

impl Calibration {
    /// Convert a raw ADC code to irradiance in W/m².
    ///
    /// Total over all of `i64`: codes outside the calibration range
    /// extrapolate linearly and are then clamped back onto the interval
    /// spanned by the two calibration irradiances.
    pub fn to_irradiance(&self, raw: i64) -> f64 {
        if self.dark_code == self.bright_code {
            // Degenerate calibration, avoid dividing by zero.
            return self.dark_irradiance;
        }
        let fraction =
            (self.dark_code - raw) as f64 / (self.dark_code - self.bright_code) as f64;
        let irradiance =
            self.dark_irradiance + fraction * (self.bright_irradiance - self.dark_irradiance);

        let lo = self.dark_irradiance.min(self.bright_irradiance);
        let hi = self.dark_irradiance.max(self.bright_irradiance);
        irradiance.clamp(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_map_to_calibration_irradiances() {
        let cal = Calibration::default();
        assert_eq!(cal.to_irradiance(4095), 0.0);
        assert_eq!(cal.to_irradiance(0), 1000.0);
    }

    #[test]
    fn midpoint_is_roughly_half_scale() {
        let cal = Calibration::default();
        let mid = cal.to_irradiance(2047);
        assert!((mid - 500.12).abs() < 0.01, "got {mid}");
    }

    #[test]
    fn output_stays_in_range_and_is_non_increasing() {
        let cal = Calibration::default();
        let mut prev = f64::INFINITY;
        for raw in 0..=4095 {
            let w = cal.to_irradiance(raw);
            assert!((0.0..=1000.0).contains(&w), "raw {raw} gave {w}");
            assert!(w <= prev, "not monotone at raw {raw}");
            prev = w;
        }
    }

    #[test]
    fn out_of_range_codes_clamp() {
        let cal = Calibration::default();
        assert_eq!(cal.to_irradiance(-500), 1000.0);
        assert_eq!(cal.to_irradiance(10_000), 0.0);
    }

    #[test]
    fn equal_calibration_codes_never_divide_by_zero() {
        let cal = Calibration {
            dark_code: 1234,
            bright_code: 1234,
            dark_irradiance: 42.0,
            bright_irradiance: 900.0,
        };
        for raw in [-1, 0, 1234, 4095, i64::MAX] {
            assert_eq!(cal.to_irradiance(raw), 42.0);
        }
    }

    #[test]
    fn alternate_curve_is_respected() {
        // Non-inverted curve: higher code means more light.
        let cal = Calibration {
            dark_code: 0,
            bright_code: 1023,
            dark_irradiance: 0.0,
            bright_irradiance: 800.0,
        };
        assert_eq!(cal.to_irradiance(0), 0.0);
        assert_eq!(cal.to_irradiance(1023), 800.0);
        assert!(cal.to_irradiance(512) > cal.to_irradiance(100));
    }
}
