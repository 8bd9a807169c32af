use eframe::egui;

use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct GardenMeterApp {
    pub state: AppState,
}

impl Default for GardenMeterApp {
    fn default() -> Self {
        let mut state = AppState::default();
        // Pick up the log left behind by a previous session, if any.
        state.reload();
        Self { state }
    }
}

impl eframe::App for GardenMeterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: device actions and status ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: time window ----
        egui::SidePanel::left("window_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: table and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::central_panel(ui, &self.state);
        });
    }
}
