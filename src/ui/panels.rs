use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – overview metrics and instructions
// ---------------------------------------------------------------------------

/// Render the left overview panel.
pub fn side_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("📋 Instructions");
    ui.label("1. Open a CSV, JSON or Parquet file");
    ui.label("2. Explore automated insights");
    ui.label("3. View the charts");
    ui.label("4. Ask for an AI summary");
    ui.separator();

    ui.heading("📈 Dataset Overview");
    let Some(report) = &state.report else {
        ui.label("No dataset loaded.");
        return;
    };
    let p = &report.profile;

    egui::Grid::new("overview_metrics")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            metric(ui, "Total Rows", p.rows);
            metric(ui, "Columns", p.columns);
            metric(ui, "Numeric Features", p.numeric_columns.len());
            metric(ui, "Categorical Features", p.categorical_columns.len());
            metric(ui, "Missing Values", p.missing_values);
            metric(ui, "Duplicate Rows", p.duplicate_rows);
        });

    ui.separator();
    ui.strong("AI mode");
    if state.settings.ai.api_key.is_some() {
        ui.label(format!("enabled ({})", state.settings.ai.model));
    } else {
        ui.label(format!("disabled: set {}", state.settings.ai.api_key_env));
    }
}

fn metric(ui: &mut Ui, label: &str, value: usize) {
    ui.label(label);
    ui.strong(data_story::insight::format::count(value));
    ui.end_row();
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(report) = &state.report {
            ui.label(format!(
                "{} rows, {} columns, {} insights",
                report.profile.rows,
                report.profile.columns,
                report.insights.len()
            ));
            ui.separator();
            if ui.button("🤖 AI Summary").clicked() {
                state.request_ai_summary();
            }
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
