//! A complete analysis run and its text renderings.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::data::model::Dataset;
use crate::insight::format;
use crate::insight::{self, Insight};
use crate::profile::{self, Profile};

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Local>,
    pub profile: Profile,
    pub insights: Vec<Insight>,
    /// Free text from the AI provider, when one was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
}

impl Report {
    /// Profiles `dataset` and runs the rule engine over it.
    pub fn generate(dataset: &Dataset, generated_at: DateTime<Local>) -> Self {
        let profile = profile::profile(dataset);
        let insights = insight::generate_insights(dataset, &profile);
        log::info!(
            "Generated {} insights for {} rows x {} columns",
            insights.len(),
            profile.rows,
            profile.columns
        );
        Report {
            generated_at,
            profile,
            insights,
            ai_summary: None,
        }
    }

    /// `Analysis Report - October 18, 2026`
    pub fn heading(&self) -> String {
        format!("Analysis Report - {}", self.generated_at.format("%B %d, %Y"))
    }

    pub fn to_markdown(&self) -> String {
        let p = &self.profile;
        let mut out = format!("## {}\n\n", self.heading());

        out.push_str("### Dataset Overview\n\n");
        out.push_str("| Metric | Value |\n|---|---|\n");
        out.push_str(&format!("| Total Rows | {} |\n", format::count(p.rows)));
        out.push_str(&format!("| Columns | {} |\n", p.columns));
        out.push_str(&format!("| Numeric Features | {} |\n", p.numeric_columns.len()));
        out.push_str(&format!("| Missing Values | {} |\n", format::count(p.missing_values)));
        out.push_str(&format!("| Duplicate Rows | {} |\n", format::count(p.duplicate_rows)));

        out.push_str("\n### Key Insights\n");
        for (idx, insight) in self.insights.iter().enumerate() {
            out.push_str(&format!("\n#### {}. {}\n\n", idx + 1, insight.title));
            for line in insight.description.lines() {
                out.push_str(line);
                out.push_str("  \n");
            }
            if let Some(spec) = &insight.chart_spec {
                out.push_str(&format!("\n_Chart: {spec}_\n"));
            }
            out.push_str("\n---\n");
        }
        if let Some(summary) = &self.ai_summary {
            out.push_str(&format!("\n### AI Summary\n\n{summary}\n"));
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Column};
    use chrono::TimeZone;

    fn report() -> Report {
        let ds = Dataset::new(vec![
            Column::new("n", vec![CellValue::Integer(1), CellValue::Null]),
            Column::new(
                "c",
                vec![CellValue::String("a".into()), CellValue::String("a".into())],
            ),
        ])
        .unwrap();
        let at = Local.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        Report::generate(&ds, at)
    }

    #[test]
    fn heading_uses_long_date() {
        assert_eq!(report().heading(), "Analysis Report - October 18, 2026");
    }

    #[test]
    fn markdown_numbers_insights_in_order() {
        let md = report().to_markdown();
        let overview = md.find("#### 1. 📊 Dataset Overview").unwrap();
        let numeric = md.find("#### 2. 📈 n Analysis").unwrap();
        let quality = md.find("#### 4. ⚠️ Missing Data").unwrap();
        assert!(overview < numeric && numeric < quality);
        assert!(md.contains("_Chart: histogram of n_"));
        assert!(md.contains("| Missing Values | 1 |"));
    }

    #[test]
    fn json_carries_profile_and_kinds() {
        let json: serde_json::Value = serde_json::from_str(&report().to_json().unwrap()).unwrap();
        assert_eq!(json["profile"]["rows"], 2);
        assert_eq!(json["insights"][0]["kind"], "overview");
        assert_eq!(json["insights"][1]["chart_spec"]["type"], "histogram");
        assert!(json["insights"][0].get("chart_spec").is_none());
        assert!(json.get("ai_summary").is_none());
    }

    #[test]
    fn ai_summary_is_rendered_in_both_formats() {
        let mut report = report();
        report.ai_summary = Some("Prices rise with age.".into());

        assert!(report.to_markdown().ends_with("### AI Summary\n\nPrices rise with age.\n"));
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["ai_summary"], "Prices rise with age.");
    }
}
