use std::ops::RangeInclusive;

use chrono::{DateTime, NaiveDateTime};
use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{GridMark, Line, Plot, PlotPoints, Points};

use crate::data::model::{Dataset, SensorReading};

// ---------------------------------------------------------------------------
// Time-series charts (central panel)
// ---------------------------------------------------------------------------

/// One plotted quantity.
struct Channel {
    id: &'static str,
    title: &'static str,
    unit: &'static str,
    color: Color32,
    value: fn(&SensorReading) -> f64,
}

fn channels() -> [Channel; 4] {
    [
        Channel {
            id: "soil_plot",
            title: "Soil moisture",
            unit: "raw",
            color: Color32::LIGHT_GREEN,
            value: |r| r.soil_moisture_raw as f64,
        },
        Channel {
            id: "irradiance_plot",
            title: "Irradiance",
            unit: "W/m²",
            color: Color32::ORANGE,
            value: |r| r.irradiance_w_m2,
        },
        Channel {
            id: "temperature_plot",
            title: "Temperature",
            unit: "°C",
            color: Color32::RED,
            value: |r| r.temperature_c,
        },
        Channel {
            id: "humidity_plot",
            title: "Humidity",
            unit: "%",
            color: Color32::LIGHT_BLUE,
            value: |r| r.humidity_pct,
        },
    ]
}

/// Render the 2×2 grid of sensor charts for the readings in `visible`.
pub fn time_series_grid(ui: &mut Ui, dataset: &Dataset, visible: &[usize]) {
    if visible.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(
                RichText::new("No readings in the selected time window.").color(Color32::YELLOW),
            );
        });
        return;
    }

    let all = channels();
    let row_height = (ui.available_height() / 2.0 - 28.0).max(120.0);

    for pair in all.chunks(2) {
        ui.columns(2, |cols: &mut [Ui]| {
            for (col, channel) in cols.iter_mut().zip(pair) {
                channel_plot(col, dataset, visible, channel, row_height);
            }
        });
    }
}

fn channel_plot(ui: &mut Ui, dataset: &Dataset, visible: &[usize], channel: &Channel, height: f32) {
    // Non-finite values would break autoscaling, leave them out.
    let points: Vec<[f64; 2]> = visible
        .iter()
        .map(|&i| {
            let r = &dataset.readings()[i];
            [timestamp_secs(r.timestamp), (channel.value)(r)]
        })
        .filter(|p| p[1].is_finite())
        .collect();

    ui.vertical(|ui: &mut Ui| {
        ui.strong(channel.title);
        if points.is_empty() {
            ui.label(
                RichText::new(format!("{}: nothing to plot", channel.title))
                    .color(Color32::YELLOW),
            );
            return;
        }

        Plot::new(channel.id)
            .height(height)
            .y_axis_label(channel.unit)
            .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
                format_time_mark(mark.value)
            })
            .allow_boxed_zoom(true)
            .allow_drag(true)
            .allow_scroll(true)
            .allow_zoom(true)
            .show(ui, |plot_ui| {
                let line = Line::new(PlotPoints::from(points.clone()))
                    .name(channel.title)
                    .color(channel.color)
                    .width(1.0);
                plot_ui.line(line);

                let markers = Points::new(PlotPoints::from(points))
                    .color(channel.color)
                    .radius(1.5);
                plot_ui.points(markers);
            });
    });
}

fn timestamp_secs(ts: NaiveDateTime) -> f64 {
    ts.and_utc().timestamp() as f64
}

/// Axis labels show clock time only, like the device's own page.
fn format_time_mark(secs: f64) -> String {
    DateTime::from_timestamp(secs as i64, 0)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default()
}
