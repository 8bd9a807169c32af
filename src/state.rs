use crate::config::AppConfig;
use crate::data::calibration::Calibration;
use crate::data::filter::window_indices;
use crate::data::loader::{self, LoadError};
use crate::data::model::{Dataset, TimeWindow};
use crate::fetch::{self, LiveReading};

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Message shown in the toolbar. Every fetch or load failure ends up here;
/// nothing propagates into the render loop.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        StatusMessage {
            level: StatusLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        StatusMessage {
            level: StatusLevel::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        StatusMessage {
            level: StatusLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        StatusMessage {
            level: StatusLevel::Error,
            text: text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,
    pub calibration: Calibration,

    /// Loaded dataset (None until a log is on disk and parses).
    pub dataset: Option<Dataset>,

    /// Selected time window as (start, end) positions into the sorted
    /// readings, both inclusive.
    pub window_selection: (usize, usize),

    /// Indices of readings inside the current window (cached).
    pub visible_indices: Vec<usize>,

    /// Last live snapshot from the device, if any.
    pub live: Option<LiveReading>,

    /// Status / error message shown in the toolbar.
    pub status_message: Option<StatusMessage>,
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            config: AppConfig::default(),
            calibration: Calibration::default(),
            dataset: None,
            window_selection: (0, 0),
            visible_indices: Vec::new(),
            live: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a freshly loaded dataset and reset the window to its bounds.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.window_selection = (0, dataset.len().saturating_sub(1));
        self.visible_indices = (0..dataset.len()).collect();
        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// The selected window as timestamps, if a dataset is loaded.
    pub fn selected_window(&self) -> Option<TimeWindow> {
        let ds = self.dataset.as_ref()?;
        let (start_idx, end_idx) = self.window_selection;
        let start = ds.readings().get(start_idx)?.timestamp;
        let end = ds.readings().get(end_idx)?.timestamp;
        Some(TimeWindow { start, end })
    }

    /// Move the window endpoints. Out-of-range positions are clamped and a
    /// crossed-over pair is swapped back into order.
    pub fn set_window_selection(&mut self, start_idx: usize, end_idx: usize) {
        let Some(ds) = &self.dataset else { return };
        let last = ds.len().saturating_sub(1);
        let start = start_idx.min(last);
        let end = end_idx.min(last);
        self.window_selection = if start <= end { (start, end) } else { (end, start) };
        self.refilter();
    }

    /// Widen the window back to the full dataset.
    pub fn reset_window(&mut self) {
        if let Some(ds) = &self.dataset {
            let last = ds.len().saturating_sub(1);
            self.window_selection = (0, last);
        }
        self.refilter();
    }

    /// Recompute `visible_indices` after a window change.
    pub fn refilter(&mut self) {
        if let (Some(ds), Some(window)) = (&self.dataset, self.selected_window()) {
            self.visible_indices = window_indices(ds, &window);
        }
    }

    /// Re-read the log from disk, replacing the cached dataset.
    pub fn reload(&mut self) {
        match loader::load_dataset(&self.config.data_file, &self.calibration) {
            Ok(ds) => {
                log::info!(
                    "loaded {} readings from '{}'",
                    ds.len(),
                    self.config.data_file.display()
                );
                self.set_dataset(ds);
            }
            Err(e) => {
                self.dataset = None;
                self.visible_indices.clear();
                self.report_load_error(e);
            }
        }
    }

    /// Download the log from the device, then reload it.
    pub fn download_and_reload(&mut self) {
        let url = self.config.download_url();
        log::info!("downloading '{url}'");
        match fetch::download_csv(&url, &self.config.data_file, self.config.fetch_timeout) {
            Ok(bytes) => {
                self.reload();
                if self.dataset.is_some() {
                    self.status_message = Some(StatusMessage::success(format!(
                        "Downloaded {bytes} bytes from the device."
                    )));
                }
            }
            Err(e) => {
                // The previous log was not touched; keep showing it.
                log::error!("download failed: {e}");
                self.status_message = Some(StatusMessage::error(format!("Download failed: {e}")));
            }
        }
    }

    /// Fetch the device's live snapshot for the toolbar.
    pub fn refresh_live(&mut self) {
        let url = self.config.live_data_url();
        match fetch::fetch_live(&url, self.config.fetch_timeout) {
            Ok(live) => self.live = Some(live),
            Err(e) => {
                log::warn!("live snapshot failed: {e}");
                self.live = None;
                self.status_message =
                    Some(StatusMessage::warning(format!("Live data unavailable: {e}")));
            }
        }
    }

    fn report_load_error(&mut self, e: LoadError) {
        let message = match &e {
            LoadError::MissingFile(_) => {
                log::info!("{e}");
                StatusMessage::info("No data file found, download the log from the device first.")
            }
            LoadError::EmptyFile => {
                log::warn!("{e}");
                StatusMessage::warning("The data file has no rows, download the log again.")
            }
            LoadError::EmptyAfterClean => {
                log::warn!("{e}");
                StatusMessage::warning(
                    "The data file contains no readings with a valid timestamp.",
                )
            }
            other => {
                log::error!("loading '{}': {other}", self.config.data_file.display());
                StatusMessage::error(format!("{other}"))
            }
        };
        self.status_message = Some(message);
    }
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

    fn state_with_times(times: &[NaiveDateTime]) -> AppState {
        let readings = times
            .iter()
            .map(|&timestamp| SensorReading {
                timestamp,
                soil_moisture_raw: 1800,
                light_raw: 2000,
                temperature_c: 21.0,
                humidity_pct: 60.0,
                irradiance_w_m2: 511.6,
            })
            .collect();
        let mut state = AppState::default();
        state.set_dataset(Dataset::from_readings(readings));
        state
    }

    #[test]
    fn new_dataset_selects_the_full_window() {
        let state = state_with_times(&[ts(9, 0), ts(9, 5), ts(9, 10)]);
        assert_eq!(state.window_selection, (0, 2));
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        let window = state.selected_window().unwrap();
        assert_eq!(window.start, ts(9, 0));
        assert_eq!(window.end, ts(9, 10));
    }

    #[test]
    fn narrowing_the_window_refilters() {
        let mut state = state_with_times(&[ts(9, 0), ts(9, 5), ts(9, 10)]);
        state.set_window_selection(0, 1);
        assert_eq!(state.visible_indices, vec![0, 1]);
        state.reset_window();
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
    }

    #[test]
    fn crossed_endpoints_are_swapped_and_clamped() {
        let mut state = state_with_times(&[ts(9, 0), ts(9, 5), ts(9, 10)]);
        state.set_window_selection(2, 0);
        assert_eq!(state.window_selection, (0, 2));
        state.set_window_selection(1, 99);
        assert_eq!(state.window_selection, (1, 2));
        assert_eq!(state.visible_indices, vec![1, 2]);
    }

    #[test]
    fn single_reading_dataset_degenerates_to_a_point() {
        let state = state_with_times(&[ts(9, 0)]);
        assert_eq!(state.window_selection, (0, 0));
        let window = state.selected_window().unwrap();
        assert_eq!(window.start, window.end);
        assert_eq!(state.visible_indices, vec![0]);
    }
}
