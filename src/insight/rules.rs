use crate::data::model::{Column, Dataset};
use crate::profile::Profile;
use crate::stats;

use super::format::{self, UNAVAILABLE};
use super::{CORRELATION_THRESHOLD, ChartSpec, Insight, InsightKind, MAX_NUMERIC_INSIGHTS};

pub(super) fn overview(_dataset: &Dataset, profile: &Profile) -> Vec<Insight> {
    vec![Insight {
        title: "📊 Dataset Overview".to_string(),
        description: format!(
            "The dataset contains {} rows and {} columns. \
             It includes {} numeric and {} categorical features.",
            format::count(profile.rows),
            profile.columns,
            profile.numeric_columns.len(),
            profile.categorical_columns.len(),
        ),
        kind: InsightKind::Overview,
        chart_spec: None,
    }]
}

pub(super) fn numeric_summaries(dataset: &Dataset, profile: &Profile) -> Vec<Insight> {
    profile
        .numeric_columns
        .iter()
        .take(MAX_NUMERIC_INSIGHTS)
        .filter_map(|name| dataset.column(name))
        .map(numeric_summary)
        .collect()
}

fn numeric_summary(column: &Column) -> Insight {
    let summary = stats::summarize(&column.numbers());
    Insight {
        title: format!("📈 {} Analysis", column.name),
        description: format!(
            "Average {}: {}, Standard deviation: {}.\nRange: {} to {}.",
            column.name.to_lowercase(),
            format::stat(summary.mean),
            format::stat(summary.std_dev),
            format::stat(summary.min),
            format::stat(summary.max),
        ),
        kind: InsightKind::Numeric,
        chart_spec: Some(ChartSpec::Histogram {
            column: column.name.clone(),
        }),
    }
}

pub(super) fn categorical_distribution(dataset: &Dataset, profile: &Profile) -> Vec<Insight> {
    let Some(column) = profile
        .categorical_columns
        .first()
        .and_then(|name| dataset.column(name))
    else {
        return Vec::new();
    };

    let counts = stats::value_counts(&column.values);
    let headline = match counts.first() {
        Some((mode, n)) => format!(
            "The most frequent {} value is '{mode}' with {n} occurrences.",
            column.name
        ),
        None => format!("The most frequent {} value is {UNAVAILABLE}.", column.name),
    };

    vec![Insight {
        title: format!("🏷️ {} Distribution", column.name),
        description: format!("{headline}\nTotal unique categories: {}.", counts.len()),
        kind: InsightKind::Categorical,
        chart_spec: Some(ChartSpec::Bar {
            column: column.name.clone(),
        }),
    }]
}

pub(super) fn data_quality(_dataset: &Dataset, profile: &Profile) -> Vec<Insight> {
    let insight = match profile.missing_percent() {
        Some(pct) if profile.missing_values > 0 => Insight {
            title: "⚠️ Missing Data".to_string(),
            description: format!(
                "The dataset contains {} missing values ({}% of total).\n\
                 Consider cleaning or imputing missing values.",
                profile.missing_values,
                format::percent(pct),
            ),
            kind: InsightKind::Quality,
            chart_spec: None,
        },
        _ => Insight {
            title: "✅ Data Quality Check".to_string(),
            description: "No missing values detected. The dataset is clean.".to_string(),
            kind: InsightKind::Quality,
            chart_spec: None,
        },
    };
    vec![insight]
}

pub(super) fn strong_correlation(dataset: &Dataset, profile: &Profile) -> Vec<Insight> {
    if profile.numeric_columns.len() < 2 {
        return Vec::new();
    }

    let columns: Vec<&Column> = profile
        .numeric_columns
        .iter()
        .filter_map(|name| dataset.column(name))
        .collect();
    let cells: Vec<Vec<Option<f64>>> = columns.iter().map(|c| c.numeric_cells()).collect();
    let matrix = stats::correlation_matrix(&cells);

    let n = columns.len();
    let strongest = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .find_map(|(i, j)| {
            matrix[i][j]
                .filter(|r| r.abs() > CORRELATION_THRESHOLD)
                .map(|r| (i, j, r))
        });

    let Some((i, j, r)) = strongest else {
        log::debug!("no numeric pair above |r| > {CORRELATION_THRESHOLD}");
        return Vec::new();
    };
    let (a, b) = (&columns[i].name, &columns[j].name);

    vec![Insight {
        title: "🔗 Strong Correlation Detected".to_string(),
        description: format!(
            "{a} and {b} have a high correlation of {}.\n\
             This means changes in one variable strongly relate to changes in the other.",
            format::stat(Some(r)),
        ),
        kind: InsightKind::Correlation,
        chart_spec: Some(ChartSpec::Scatter {
            column_x: a.clone(),
            column_y: b.clone(),
        }),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;
    use crate::profile::profile;

    fn dataset(columns: Vec<Column>) -> (Dataset, Profile) {
        let ds = Dataset::new(columns).unwrap();
        let p = profile(&ds);
        (ds, p)
    }

    fn text(values: &[&str]) -> Vec<CellValue> {
        values
            .iter()
            .map(|v| {
                if v.is_empty() {
                    CellValue::Null
                } else {
                    CellValue::String(v.to_string())
                }
            })
            .collect()
    }

    #[test]
    fn overview_formats_large_row_counts() {
        let p = Profile {
            rows: 12345,
            columns: 4,
            numeric_columns: vec!["a".into(), "b".into()],
            categorical_columns: vec!["c".into()],
            missing_values: 0,
            duplicate_rows: 0,
        };
        let insight = &overview(&Dataset::default(), &p)[0];
        assert_eq!(
            insight.description,
            "The dataset contains 12,345 rows and 4 columns. \
             It includes 2 numeric and 1 categorical features."
        );
    }

    #[test]
    fn numeric_summary_text() {
        let (ds, p) = dataset(vec![Column::new(
            "Price",
            vec![CellValue::Integer(1), CellValue::Integer(2), CellValue::Integer(3)],
        )]);
        let insight = &numeric_summaries(&ds, &p)[0];
        assert_eq!(insight.title, "📈 Price Analysis");
        assert_eq!(
            insight.description,
            "Average price: 2.00, Standard deviation: 1.00.\nRange: 1.00 to 3.00."
        );
    }

    #[test]
    fn single_value_column_reports_unavailable_std() {
        let (ds, p) = dataset(vec![Column::new("v", vec![CellValue::Float(4.0)])]);
        let insight = &numeric_summaries(&ds, &p)[0];
        assert!(insight.description.contains("Standard deviation: unavailable"));
        assert!(insight.description.contains("Range: 4.00 to 4.00"));
    }

    #[test]
    fn categorical_mode_tie_goes_to_first_seen() {
        let (ds, p) = dataset(vec![Column::new(
            "city",
            text(&["Paris", "London", "London", "Paris", "", "Rome"]),
        )]);
        let insight = &categorical_distribution(&ds, &p)[0];
        assert_eq!(
            insight.description,
            "The most frequent city value is 'Paris' with 2 occurrences.\n\
             Total unique categories: 3."
        );
        assert_eq!(insight.chart_spec, Some(ChartSpec::Bar { column: "city".into() }));
    }

    #[test]
    fn categorical_rule_needs_a_categorical_column() {
        let (ds, p) = dataset(vec![Column::new("n", vec![CellValue::Integer(1)])]);
        assert!(categorical_distribution(&ds, &p).is_empty());
    }

    #[test]
    fn quality_reports_percentage_of_all_cells() {
        let (ds, p) = dataset(vec![
            Column::new("a", vec![CellValue::Integer(1), CellValue::Null]),
            Column::new("b", text(&["x", "y"])),
        ]);
        let insight = &data_quality(&ds, &p)[0];
        assert_eq!(insight.title, "⚠️ Missing Data");
        assert!(insight.description.starts_with("The dataset contains 1 missing values (25.00% of total)."));
    }

    #[test]
    fn quality_prints_the_raw_missing_count() {
        let p = Profile {
            rows: 1_000,
            columns: 2,
            numeric_columns: vec!["a".into(), "b".into()],
            categorical_columns: Vec::new(),
            missing_values: 1_500,
            duplicate_rows: 0,
        };
        let insight = &data_quality(&Dataset::default(), &p)[0];
        assert!(insight.description.starts_with("The dataset contains 1500 missing values (75.00% of total)."));
    }

    #[test]
    fn quality_confirms_clean_data() {
        let (ds, p) = dataset(vec![Column::new("a", vec![CellValue::Integer(1)])]);
        let insight = &data_quality(&ds, &p)[0];
        assert_eq!(insight.title, "✅ Data Quality Check");
        assert_eq!(insight.chart_spec, None);
    }

    #[test]
    fn correlation_text_carries_signed_coefficient() {
        let (ds, p) = dataset(vec![
            Column::new("up", (1..=5).map(CellValue::Integer).collect()),
            Column::new("down", (1..=5).rev().map(CellValue::Integer).collect()),
        ]);
        let insight = &strong_correlation(&ds, &p)[0];
        assert!(insight.description.starts_with("up and down have a high correlation of -1.00."));
    }
}
