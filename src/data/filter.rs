use super::model::{Dataset, TimeWindow};

// ---------------------------------------------------------------------------
// Time-window selection
// ---------------------------------------------------------------------------

/// Return indices of readings falling inside `window`, both ends inclusive.
///
/// The dataset is already sorted, so the result is a contiguous ascending
/// run; it is kept as an index list so the table and plots can share it
/// without cloning rows.
pub fn window_indices(dataset: &Dataset, window: &TimeWindow) -> Vec<usize> {
    dataset
        .readings()
        .iter()
        .enumerate()
        .filter(|(_, r)| window.contains(r.timestamp))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::SensorReading;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn dataset(times: &[NaiveDateTime]) -> Dataset {
        Dataset::from_readings(
            times
                .iter()
                .map(|&timestamp| SensorReading {
                    timestamp,
                    soil_moisture_raw: 1800,
                    light_raw: 2000,
                    temperature_c: 21.0,
                    humidity_pct: 60.0,
                    irradiance_w_m2: 511.6,
                })
                .collect(),
        )
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let ds = dataset(&[ts(9, 0), ts(9, 5), ts(9, 10)]);
        let window = TimeWindow {
            start: ts(9, 0),
            end: ts(9, 5),
        };
        assert_eq!(window_indices(&ds, &window), vec![0, 1]);
    }

    #[test]
    fn full_window_selects_everything() {
        let ds = dataset(&[ts(9, 0), ts(9, 5), ts(9, 10)]);
        let (start, end) = ds.time_bounds().unwrap();
        let window = TimeWindow { start, end };
        assert_eq!(window_indices(&ds, &window), vec![0, 1, 2]);
    }

    #[test]
    fn single_reading_matches_only_its_own_timestamp() {
        let ds = dataset(&[ts(9, 0)]);

        let own = TimeWindow {
            start: ts(9, 0),
            end: ts(9, 0),
        };
        assert_eq!(window_indices(&ds, &own), vec![0]);

        let elsewhere = TimeWindow {
            start: ts(10, 0),
            end: ts(11, 0),
        };
        assert!(window_indices(&ds, &elsewhere).is_empty());
    }

    #[test]
    fn duplicate_timestamps_are_all_selected() {
        let ds = dataset(&[ts(9, 0), ts(9, 5), ts(9, 5), ts(9, 10)]);
        let window = TimeWindow {
            start: ts(9, 5),
            end: ts(9, 5),
        };
        assert_eq!(window_indices(&ds, &window), vec![1, 2]);
    }
}
