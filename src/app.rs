use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, story};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DataStoryApp {
    pub state: AppState,
}

impl DataStoryApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for DataStoryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: overview metrics ----
        egui::SidePanel::left("overview_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state);
            });

        // ---- Central panel: the data story ----
        egui::CentralPanel::default().show(ctx, |ui| {
            story::story_view(ui, &mut self.state);
        });
    }
}
