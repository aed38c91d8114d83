use std::collections::HashMap;
use std::path::Path;

use data_story::ai;
use data_story::chart::{Chart, build_chart};
use data_story::config::Settings;
use data_story::data::loader::load_file;
use data_story::data::model::Dataset;
use data_story::insight::ChartSpec;
use data_story::report::Report;

/// Rows shown in the data preview.
pub const PREVIEW_ROWS: usize = 10;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub settings: Settings,

    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// Profile and insights of the loaded dataset.
    pub report: Option<Report>,

    /// Charts built on first display, keyed by spec.
    charts: HashMap<ChartSpec, Option<Chart>>,

    /// Axes of the custom scatter plot.
    pub scatter_x: Option<String>,
    pub scatter_y: Option<String>,

    /// Last AI summary, if one was requested.
    pub ai_summary: Option<String>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            dataset: None,
            report: None,
            charts: HashMap::new(),
            scatter_x: None,
            scatter_y: None,
            ai_summary: None,
            status_message: None,
        }
    }

    /// Load a file and ingest it, or record the error for display.
    pub fn open(&mut self, path: &Path) {
        match load_file(path, self.settings.loader.max_bytes()) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset: analyse it and reset derived state.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        let report = Report::generate(&dataset, chrono::Local::now());

        // Default scatter axes: first two numeric columns.
        let numeric = &report.profile.numeric_columns;
        self.scatter_x = numeric.first().cloned();
        self.scatter_y = numeric.get(1).or(numeric.first()).cloned();

        self.report = Some(report);
        self.dataset = Some(dataset);
        self.charts.clear();
        self.ai_summary = None;
        self.status_message = None;
    }

    /// The chart for `spec`, built on first request.
    pub fn chart(&mut self, spec: &ChartSpec) -> Option<&Chart> {
        let dataset = self.dataset.as_ref()?;
        self.charts
            .entry(spec.clone())
            .or_insert_with(|| build_chart(dataset, spec))
            .as_ref()
    }

    /// Spec for the user-selected scatter, if two distinct axes are chosen.
    pub fn custom_scatter_spec(&self) -> Option<ChartSpec> {
        match (&self.scatter_x, &self.scatter_y) {
            (Some(x), Some(y)) if x != y => Some(ChartSpec::Scatter {
                column_x: x.clone(),
                column_y: y.clone(),
            }),
            _ => None,
        }
    }

    /// Ask the configured provider for a summary of the loaded dataset.
    pub fn request_ai_summary(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let summary = ai::generate_summary(
            &ds.column_names(),
            &ds.head(ai::SAMPLE_ROWS),
            self.settings.ai.api_key.as_deref(),
            &self.settings.ai,
        );
        self.ai_summary = Some(summary);
    }
}
