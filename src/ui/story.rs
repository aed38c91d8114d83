use eframe::egui::{self, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use data_story::insight::ChartSpec;

use crate::state::{AppState, PREVIEW_ROWS};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Central panel – the data story
// ---------------------------------------------------------------------------

/// Render the report: preview, numbered insights with charts, extras.
pub fn story_view(ui: &mut Ui, state: &mut AppState) {
    let Some(report) = &state.report else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("🚀 Open a dataset to generate its data story  (File → Open…)");
        });
        return;
    };
    let heading = report.heading();
    let insights = report.insights.clone();
    let numeric = report.profile.numeric_columns.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("📖 Data Story");
            ui.label(egui::RichText::new(heading).size(20.0));
            ui.separator();

            egui::CollapsingHeader::new("👀 Preview Data")
                .default_open(false)
                .show(ui, |ui: &mut Ui| preview_table(ui, state));
            ui.separator();

            ui.heading("🔍 Key Insights");
            for (idx, insight) in insights.iter().enumerate() {
                ui.add_space(8.0);
                ui.strong(format!("{}. {}", idx + 1, insight.title));
                ui.label(insight.description.as_str());
                if let Some(spec) = &insight.chart_spec {
                    chart_block(ui, state, &format!("insight_{idx}"), spec);
                }
                ui.separator();
            }

            if let Some(summary) = &state.ai_summary {
                ui.heading("🤖 AI Summary");
                ui.label(summary.as_str());
                ui.separator();
            }

            if numeric.len() >= 2 {
                ui.heading("🔗 Correlations");
                chart_block(ui, state, "heatmap", &ChartSpec::Heatmap);
                ui.separator();

                ui.heading("📊 Custom Visualization");
                ui.horizontal(|ui: &mut Ui| {
                    axis_picker(ui, "X axis", &numeric, &mut state.scatter_x);
                    axis_picker(ui, "Y axis", &numeric, &mut state.scatter_y);
                });
                match state.custom_scatter_spec() {
                    Some(spec) => chart_block(ui, state, "custom_scatter", &spec),
                    None => {
                        ui.label("Pick two different columns.");
                    }
                }
            }
        });
}

fn chart_block(ui: &mut Ui, state: &mut AppState, id: &str, spec: &ChartSpec) {
    let settings = state.settings.charts.clone();
    if let Some(chart) = state.chart(spec) {
        plot::show_chart(ui, id, chart, &settings);
    }
}

fn axis_picker(ui: &mut Ui, label: &str, options: &[String], selected: &mut Option<String>) {
    ui.label(label);
    egui::ComboBox::from_id_salt(label)
        .selected_text(selected.clone().unwrap_or_default())
        .show_ui(ui, |ui: &mut Ui| {
            for col in options {
                if ui
                    .selectable_label(selected.as_deref() == Some(col.as_str()), col.as_str())
                    .clicked()
                {
                    *selected = Some(col.clone());
                }
            }
        });
}

fn preview_table(ui: &mut Ui, state: &AppState) {
    let Some(ds) = &state.dataset else {
        return;
    };
    let names = ds.column_names();
    let rows = ds.head(PREVIEW_ROWS);

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(TableColumn::auto().at_least(60.0), names.len())
            .header(20.0, |mut header| {
                for name in &names {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name.as_str());
                    });
                }
            })
            .body(|mut body| {
                for row in &rows {
                    body.row(18.0, |mut table_row| {
                        for value in row {
                            table_row.col(|ui: &mut Ui| {
                                ui.label(value.as_str());
                            });
                        }
                    });
                }
            });
    });
}
