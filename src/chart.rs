//! Chart selection: turns a [`ChartSpec`] into renderable chart data.
//!
//! The selector is stateless. It re-checks the dataset on every call, so a
//! spec that no longer fits (missing column, wrong type, too few numeric
//! columns for a heatmap) yields `None` instead of a broken chart.

use crate::color::{ColorScale, MISSING_COLOR, Rgb};
use crate::data::model::{Column, ColumnKind, Dataset};
use crate::insight::ChartSpec;
use crate::stats::{self, Bin, LinearFit};

/// Histogram bucket count.
pub const HISTOGRAM_BINS: usize = 30;

/// Bar charts show at most this many distinct values.
pub const BAR_TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramChart {
    pub title: String,
    pub column: String,
    pub bins: Vec<Bin>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarEntry {
    pub label: String,
    pub count: usize,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub column: String,
    /// Most frequent first.
    pub bars: Vec<BarEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendLine {
    pub fit: LinearFit,
    pub x_min: f64,
    pub x_max: f64,
}

impl TrendLine {
    /// End points of the line segment over the observed x range.
    pub fn segment(&self) -> [[f64; 2]; 2] {
        [
            [self.x_min, self.fit.predict(self.x_min)],
            [self.x_max, self.fit.predict(self.x_max)],
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChart {
    pub title: String,
    pub x_column: String,
    pub y_column: String,
    pub points: Vec<[f64; 2]>,
    pub trend: Option<TrendLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapChart {
    pub title: String,
    pub columns: Vec<String>,
    /// Symmetric; `None` where the coefficient is undefined.
    pub matrix: Vec<Vec<Option<f64>>>,
    pub colors: Vec<Vec<Rgb>>,
}

/// Renderable chart data handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Histogram(HistogramChart),
    Bar(BarChart),
    Scatter(ScatterChart),
    Heatmap(HeatmapChart),
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::Histogram(c) => &c.title,
            Chart::Bar(c) => &c.title,
            Chart::Scatter(c) => &c.title,
            Chart::Heatmap(c) => &c.title,
        }
    }
}

/// Builds the chart described by `spec`, or `None` if the dataset cannot
/// support it.
pub fn build_chart(dataset: &Dataset, spec: &ChartSpec) -> Option<Chart> {
    let chart = match spec {
        ChartSpec::Histogram { column } => numeric_column(dataset, column).map(histogram),
        ChartSpec::Bar { column } => dataset.column(column).map(bar),
        ChartSpec::Scatter { column_x, column_y } => {
            match (numeric_column(dataset, column_x), numeric_column(dataset, column_y)) {
                (Some(x), Some(y)) => Some(scatter(x, y)),
                _ => None,
            }
        }
        ChartSpec::Heatmap => heatmap(dataset),
    };
    match &chart {
        Some(c) => log::debug!("built {spec}: {}", c.title()),
        None => log::warn!("cannot build {spec} for this dataset"),
    }
    chart
}

fn numeric_column<'a>(dataset: &'a Dataset, name: &str) -> Option<&'a Column> {
    dataset
        .column(name)
        .filter(|c| c.kind == ColumnKind::Numeric)
}

fn histogram(column: &Column) -> Chart {
    Chart::Histogram(HistogramChart {
        title: format!("Distribution of {}", column.name),
        column: column.name.clone(),
        bins: stats::histogram(&column.numbers(), HISTOGRAM_BINS),
    })
}

fn bar(column: &Column) -> Chart {
    let counts: Vec<_> = stats::value_counts(&column.values)
        .into_iter()
        .take(BAR_TOP_N)
        .collect();
    let max = counts.first().map_or(0, |c| c.1) as f64;
    let min = counts.last().map_or(0, |c| c.1) as f64;
    let scale = ColorScale::viridis();

    Chart::Bar(BarChart {
        title: format!("Top {} Categories", column.name),
        column: column.name.clone(),
        bars: counts
            .into_iter()
            .map(|(value, count)| BarEntry {
                label: value.to_string(),
                count,
                color: scale.sample_range(count as f64, min, max),
            })
            .collect(),
    })
}

fn scatter(x: &Column, y: &Column) -> Chart {
    let points: Vec<[f64; 2]> = x
        .numeric_cells()
        .into_iter()
        .zip(y.numeric_cells())
        .filter_map(|(a, b)| Some([a?, b?]))
        .collect();

    let trend = stats::linear_fit(&points).map(|fit| TrendLine {
        fit,
        x_min: points.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min),
        x_max: points.iter().map(|p| p[0]).fold(f64::NEG_INFINITY, f64::max),
    });

    Chart::Scatter(ScatterChart {
        title: format!("{} vs {}", y.name, x.name),
        x_column: x.name.clone(),
        y_column: y.name.clone(),
        points,
        trend,
    })
}

fn heatmap(dataset: &Dataset) -> Option<Chart> {
    let numeric: Vec<&Column> = dataset.numeric_columns().collect();
    if numeric.len() < 2 {
        return None;
    }
    let cells: Vec<Vec<Option<f64>>> = numeric.iter().map(|c| c.numeric_cells()).collect();
    let matrix = stats::correlation_matrix(&cells);

    // The colour range follows the coefficients actually present.
    let defined = || matrix.iter().flatten().flatten().copied();
    let min = defined().fold(f64::INFINITY, f64::min);
    let max = defined().fold(f64::NEG_INFINITY, f64::max);

    let scale = ColorScale::rdbu();
    let colors = matrix
        .iter()
        .map(|row| {
            row.iter()
                .map(|r| r.map_or(MISSING_COLOR, |r| scale.sample_range(r, min, max)))
                .collect()
        })
        .collect();

    Some(Chart::Heatmap(HeatmapChart {
        title: "Correlation Heatmap".to_string(),
        columns: numeric.iter().map(|c| c.name.clone()).collect(),
        matrix,
        colors,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;
    use palette::Srgb;

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Column::new(
                "x",
                vec![
                    CellValue::Integer(1),
                    CellValue::Integer(2),
                    CellValue::Null,
                    CellValue::Integer(4),
                ],
            ),
            Column::new(
                "y",
                vec![
                    CellValue::Float(3.0),
                    CellValue::Float(5.0),
                    CellValue::Float(7.0),
                    CellValue::Null,
                ],
            ),
            Column::new(
                "tag",
                ["a", "b", "a", "c"]
                    .iter()
                    .map(|s| CellValue::String(s.to_string()))
                    .collect(),
            ),
        ])
        .unwrap()
    }

    fn spec_for(column: &str) -> ChartSpec {
        ChartSpec::Histogram {
            column: column.into(),
        }
    }

    #[test]
    fn histogram_ignores_missing_values() {
        let Some(Chart::Histogram(h)) = build_chart(&dataset(), &spec_for("x")) else {
            panic!("expected histogram");
        };
        assert_eq!(h.bins.len(), HISTOGRAM_BINS);
        assert_eq!(h.bins.iter().map(|b| b.count).sum::<usize>(), 3);
        assert_eq!(h.title, "Distribution of x");
    }

    #[test]
    fn histogram_requires_a_numeric_column() {
        assert_eq!(build_chart(&dataset(), &spec_for("tag")), None);
        assert_eq!(build_chart(&dataset(), &spec_for("nope")), None);
    }

    #[test]
    fn bar_orders_by_frequency_and_colours_by_count() {
        let spec = ChartSpec::Bar { column: "tag".into() };
        let Some(Chart::Bar(b)) = build_chart(&dataset(), &spec) else {
            panic!("expected bar chart");
        };
        let labels: Vec<&str> = b.bars.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
        assert_eq!(b.bars[0].count, 2);
        let viridis = ColorScale::viridis();
        assert_eq!(b.bars[0].color, viridis.sample(1.0));
        assert_eq!(b.bars[2].color, viridis.sample(0.0));
    }

    #[test]
    fn bar_keeps_only_top_ten() {
        let values = (0..25).map(|i| CellValue::String(format!("v{}", i % 15))).collect();
        let ds = Dataset::new(vec![Column::new("k", values)]).unwrap();
        let Some(Chart::Bar(b)) = build_chart(&ds, &ChartSpec::Bar { column: "k".into() }) else {
            panic!("expected bar chart");
        };
        assert_eq!(b.bars.len(), BAR_TOP_N);
        assert_eq!(b.bars[0].label, "v0");
    }

    #[test]
    fn scatter_uses_complete_pairs_and_fits_a_trend() {
        let spec = ChartSpec::Scatter {
            column_x: "x".into(),
            column_y: "y".into(),
        };
        let Some(Chart::Scatter(s)) = build_chart(&dataset(), &spec) else {
            panic!("expected scatter");
        };
        assert_eq!(s.points, vec![[1.0, 3.0], [2.0, 5.0]]);
        assert_eq!(s.title, "y vs x");
        // Two points are too few for a regression.
        assert_eq!(s.trend, None);

        let ds = Dataset::new(vec![
            Column::new("x", (1..=3).map(CellValue::Integer).collect()),
            Column::new("y", [3, 5, 7].into_iter().map(CellValue::Integer).collect()),
        ])
        .unwrap();
        let Some(Chart::Scatter(s)) = build_chart(&ds, &spec) else {
            panic!("expected scatter");
        };
        let [[x0, y0], [x1, y1]] = s.trend.unwrap().segment();
        assert_eq!((x0, x1), (1.0, 3.0));
        assert!((y0 - 3.0).abs() < 1e-9 && (y1 - 7.0).abs() < 1e-9);
    }

    #[test]
    fn heatmap_needs_two_numeric_columns() {
        let Some(Chart::Heatmap(h)) = build_chart(&dataset(), &ChartSpec::Heatmap) else {
            panic!("expected heatmap");
        };
        assert_eq!(h.columns, vec!["x", "y"]);
        assert_eq!(h.matrix[0][1], h.matrix[1][0]);
        assert_eq!(h.colors[0][0], ColorScale::rdbu().sample(1.0));

        let single = Dataset::new(vec![Column::new("x", vec![CellValue::Integer(1)])]).unwrap();
        assert_eq!(build_chart(&single, &ChartSpec::Heatmap), None);
    }

    #[test]
    fn heatmap_colours_span_the_observed_range() {
        let ds = Dataset::new(vec![
            Column::new("a", (1..=4).map(CellValue::Integer).collect()),
            Column::new("b", [1, 3, 2, 4].into_iter().map(CellValue::Integer).collect()),
        ])
        .unwrap();
        let Some(Chart::Heatmap(h)) = build_chart(&ds, &ChartSpec::Heatmap) else {
            panic!("expected heatmap");
        };
        let rdbu = ColorScale::rdbu();
        // r(a, b) = 0.8 is the lowest coefficient, so it takes the low end.
        assert!((h.matrix[0][1].unwrap() - 0.8).abs() < 1e-9);
        assert_eq!(h.colors[0][1], rdbu.sample(0.0));
        assert_eq!(h.colors[1][1], rdbu.sample(1.0));
    }

    #[test]
    fn undefined_heatmap_cells_are_grey() {
        let ds = Dataset::new(vec![
            Column::new("a", vec![CellValue::Integer(1), CellValue::Integer(1)]),
            Column::new("b", vec![CellValue::Integer(1), CellValue::Integer(2)]),
        ])
        .unwrap();
        let Some(Chart::Heatmap(h)) = build_chart(&ds, &ChartSpec::Heatmap) else {
            panic!("expected heatmap");
        };
        assert_eq!(h.colors[0][1], MISSING_COLOR);
        assert_eq!(h.colors[0][0], Srgb::new(160, 160, 160));
    }
}
