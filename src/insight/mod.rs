//! Rule-based insight generation.
//!
//! Each rule is a plain function of the dataset and its [`Profile`]. The
//! engine runs them in a fixed order and concatenates what they return;
//! no rule reads another rule's output.
//!
//! ```text
//!  overview → numeric (≤3) → categorical (≤1) → quality (1) → correlation (≤1)
//! ```

pub mod format;
mod rules;

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;

use crate::data::model::Dataset;
use crate::profile::Profile;

/// Absolute Pearson coefficient a pair must exceed to be reported.
pub const CORRELATION_THRESHOLD: f64 = 0.7;

/// Only the first numeric columns (header order) get a summary insight.
pub const MAX_NUMERIC_INSIGHTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Overview,
    Numeric,
    Categorical,
    Quality,
    Correlation,
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InsightKind::Overview => "overview",
            InsightKind::Numeric => "numeric",
            InsightKind::Categorical => "categorical",
            InsightKind::Quality => "quality",
            InsightKind::Correlation => "correlation",
        };
        f.write_str(s)
    }
}

/// Which chart accompanies an insight, and over which columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChartSpec {
    Histogram { column: String },
    Bar { column: String },
    Scatter { column_x: String, column_y: String },
    Heatmap,
}

impl fmt::Display for ChartSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartSpec::Histogram { column } => write!(f, "histogram of {column}"),
            ChartSpec::Bar { column } => write!(f, "bar chart of {column}"),
            ChartSpec::Scatter { column_x, column_y } => {
                write!(f, "scatter of {column_y} vs {column_x}")
            }
            ChartSpec::Heatmap => write!(f, "correlation heatmap"),
        }
    }
}

/// One unit of generated narrative plus an optional chart reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub title: String,
    pub description: String,
    pub kind: InsightKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_spec: Option<ChartSpec>,
}

type Rule = fn(&Dataset, &Profile) -> Vec<Insight>;

const RULES: [(&str, Rule); 5] = [
    ("overview", rules::overview),
    ("numeric", rules::numeric_summaries),
    ("categorical", rules::categorical_distribution),
    ("quality", rules::data_quality),
    ("correlation", rules::strong_correlation),
];

/// Runs every rule in order and returns the insights in display order.
///
/// A rule that panics is logged and skipped; the remaining rules still run.
pub fn generate_insights(dataset: &Dataset, profile: &Profile) -> Vec<Insight> {
    run_rules(&RULES, dataset, profile)
}

fn run_rules(rules: &[(&str, Rule)], dataset: &Dataset, profile: &Profile) -> Vec<Insight> {
    let mut insights = Vec::new();
    for (name, rule) in rules {
        match panic::catch_unwind(AssertUnwindSafe(|| rule(dataset, profile))) {
            Ok(produced) => {
                log::debug!("rule '{name}' produced {} insight(s)", produced.len());
                insights.extend(produced);
            }
            Err(_) => log::error!("rule '{name}' failed; skipping it"),
        }
    }
    insights
}
