use chrono::NaiveDateTime;
use eframe::egui::{self, Color32, RichText, Slider, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Dataset;
use crate::state::{AppState, StatusLevel};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the toolbar: device actions, counters, live snapshot, status.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        if ui
            .button("⟳ Download log")
            .on_hover_text("Fetch the CSV log from the device")
            .clicked()
        {
            state.download_and_reload();
        }
        if ui
            .button("Live")
            .on_hover_text("Fetch the device's current readings")
            .clicked()
        {
            state.refresh_live();
        }

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} readings, {} in window",
                ds.len(),
                state.visible_indices.len()
            ));
            if let Some((first, last)) = ds.time_bounds() {
                ui.label(
                    RichText::new(format!("{} – {}", format_ts(first), format_ts(last))).weak(),
                );
            }
            ui.separator();
        }

        if let Some(live) = &state.live {
            ui.label(format!(
                "Live: {:.1} °C · {:.1} % · {:.0} W/m² (raw {}) · soil {} ({})",
                live.temperature,
                live.humidity,
                live.irradiance,
                live.light_raw,
                live.soil_raw,
                live.status
            ));
            ui.separator();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(&msg.text).color(status_color(msg.level)));
        }
    });
}

fn status_color(level: StatusLevel) -> Color32 {
    match level {
        StatusLevel::Info => Color32::LIGHT_BLUE,
        StatusLevel::Success => Color32::LIGHT_GREEN,
        StatusLevel::Warning => Color32::YELLOW,
        StatusLevel::Error => Color32::RED,
    }
}

// ---------------------------------------------------------------------------
// Left side panel – time window
// ---------------------------------------------------------------------------

/// Render the window selector and device settings.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Time window");
    ui.separator();

    // Clone the axis so slider closures don't borrow the state.
    let timestamps: Vec<NaiveDateTime> = state
        .dataset
        .as_ref()
        .map(|ds| ds.readings().iter().map(|r| r.timestamp).collect())
        .unwrap_or_default();

    match timestamps.len() {
        0 => {
            ui.label("No data loaded.");
        }
        1 => {
            ui.label(format!(
                "Only one reading available, at {}.",
                format_ts(timestamps[0])
            ));
        }
        n => {
            let last = n - 1;
            let (mut start_idx, mut end_idx) = state.window_selection;
            let mut changed = false;

            ui.label("From");
            changed |= ui
                .add(
                    Slider::new(&mut start_idx, 0..=last).custom_formatter(format_slider_ts(
                        timestamps.clone(),
                    )),
                )
                .changed();

            ui.label("To");
            changed |= ui
                .add(
                    Slider::new(&mut end_idx, 0..=last)
                        .custom_formatter(format_slider_ts(timestamps)),
                )
                .changed();

            if changed {
                state.set_window_selection(start_idx, end_idx);
            }

            if let Some(window) = state.selected_window() {
                ui.add_space(4.0);
                ui.label(
                    RichText::new(format!(
                        "{}  →  {}",
                        format_ts(window.start),
                        format_ts(window.end)
                    ))
                    .weak(),
                );
            }

            if ui.button("Reset to full range").clicked() {
                state.reset_window();
            }
        }
    }

    ui.add_space(8.0);
    ui.separator();
    ui.heading("Device");
    ui.label("Address");
    ui.text_edit_singleline(&mut state.config.device_url);
}

fn format_slider_ts(
    timestamps: Vec<NaiveDateTime>,
) -> impl Fn(f64, std::ops::RangeInclusive<usize>) -> String + 'static {
    move |value, _| {
        timestamps
            .get(value as usize)
            .map(|ts| ts.format("%H:%M:%S").to_string())
            .unwrap_or_default()
    }
}

fn format_ts(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

// ---------------------------------------------------------------------------
// Central panel – table and charts
// ---------------------------------------------------------------------------

/// Render the filtered readings as a table plus the chart grid.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Download the device log to see readings.");
        });
        return;
    };

    ui.heading("Readings");
    readings_table(ui, dataset, &state.visible_indices);

    ui.separator();
    plot::time_series_grid(ui, dataset, &state.visible_indices);
}

fn readings_table(ui: &mut Ui, dataset: &Dataset, visible: &[usize]) {
    let height = (ui.available_height() * 0.3).max(120.0);

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(150.0))
        .columns(Column::remainder(), 5)
        .max_scroll_height(height)
        .header(20.0, |mut header| {
            for title in [
                "Time",
                "Soil raw",
                "Light raw",
                "Irradiance (W/m²)",
                "Temperature (°C)",
                "Humidity (%)",
            ] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, visible.len(), |mut row| {
                let reading = &dataset.readings()[visible[row.index()]];
                row.col(|ui| {
                    ui.monospace(format_ts(reading.timestamp));
                });
                row.col(|ui| {
                    ui.label(reading.soil_moisture_raw.to_string());
                });
                row.col(|ui| {
                    ui.label(reading.light_raw.to_string());
                });
                row.col(|ui| {
                    ui.label(format!("{:.1}", reading.irradiance_w_m2));
                });
                row.col(|ui| {
                    ui.label(format!("{:.1}", reading.temperature_c));
                });
                row.col(|ui| {
                    ui.label(format!("{:.1}", reading.humidity_pct));
                });
            });
        });
}
