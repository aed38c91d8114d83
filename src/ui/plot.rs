use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use data_story::chart::{Chart, HeatmapChart};
use data_story::color::Rgb;
use data_story::config::ChartSettings;

fn to_color32(c: Rgb) -> Color32 {
    Color32::from_rgb(c.red, c.green, c.blue)
}

/// Axis formatter that prints `labels[i]` at integer positions only.
fn label_axis(
    labels: Vec<String>,
) -> impl Fn(GridMark, &std::ops::RangeInclusive<f64>) -> String + 'static {
    move |mark, _range| {
        let i = mark.value.round();
        if (mark.value - i).abs() > 1e-6 || i < 0.0 {
            return String::new();
        }
        labels.get(i as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Chart rendering
// ---------------------------------------------------------------------------

/// Render any chart produced by the selector.
pub fn show_chart(ui: &mut Ui, id: &str, chart: &Chart, settings: &ChartSettings) {
    ui.strong(chart.title());
    let primary = to_color32(settings.primary_rgb());

    match chart {
        Chart::Histogram(h) => {
            let bars: Vec<Bar> = h
                .bins
                .iter()
                .map(|b| {
                    Bar::new((b.lower + b.upper) / 2.0, b.count as f64)
                        .width(b.upper - b.lower)
                        .fill(primary)
                        .name(format!("{:.2} – {:.2}", b.lower, b.upper))
                })
                .collect();
            Plot::new(id)
                .height(settings.height)
                .x_axis_label(h.column.as_str())
                .y_axis_label("count")
                .show(ui, |plot_ui| {
                    plot_ui.bar_chart(BarChart::new(bars));
                });
        }
        Chart::Bar(b) => {
            let labels: Vec<String> = b.bars.iter().map(|e| e.label.clone()).collect();
            let bars: Vec<Bar> = b
                .bars
                .iter()
                .enumerate()
                .map(|(i, e)| {
                    Bar::new(i as f64, e.count as f64)
                        .width(0.8)
                        .fill(to_color32(e.color))
                        .name(&e.label)
                })
                .collect();
            Plot::new(id)
                .height(settings.height)
                .x_axis_label(b.column.as_str())
                .y_axis_label("Count")
                .x_axis_formatter(label_axis(labels))
                .show(ui, |plot_ui| {
                    plot_ui.bar_chart(BarChart::new(bars));
                });
        }
        Chart::Scatter(s) => {
            let points: PlotPoints = s.points.iter().copied().collect();
            Plot::new(id)
                .height(settings.height)
                .legend(Legend::default())
                .x_axis_label(s.x_column.as_str())
                .y_axis_label(s.y_column.as_str())
                .show(ui, |plot_ui| {
                    plot_ui.points(Points::new(points).radius(3.0).color(primary).name("observations"));
                    if let Some(trend) = &s.trend {
                        let segment: PlotPoints = trend.segment().into_iter().collect();
                        plot_ui.line(
                            Line::new(segment)
                                .color(Color32::from_rgb(0x76, 0x4b, 0xa2))
                                .width(2.0)
                                .name("OLS trend"),
                        );
                    }
                });
        }
        Chart::Heatmap(h) => heatmap(ui, id, h, settings),
    }
}

/// Grid of coloured cells; row 0 is drawn at the top.
fn heatmap(ui: &mut Ui, id: &str, h: &HeatmapChart, settings: &ChartSettings) {
    let n = h.columns.len();
    let x_labels = h.columns.clone();
    let y_labels: Vec<String> = h.columns.iter().rev().cloned().collect();

    Plot::new(id)
        .height(settings.height)
        .data_aspect(1.0)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .x_axis_formatter(label_axis(x_labels))
        .y_axis_formatter(label_axis(y_labels))
        .show(ui, |plot_ui| {
            for (i, row) in h.matrix.iter().enumerate() {
                let y = (n - 1 - i) as f64;
                for (j, r) in row.iter().enumerate() {
                    let x = j as f64;
                    let cell: PlotPoints = vec![
                        [x - 0.5, y - 0.5],
                        [x + 0.5, y - 0.5],
                        [x + 0.5, y + 0.5],
                        [x - 0.5, y + 0.5],
                    ]
                    .into();
                    plot_ui.polygon(
                        Polygon::new(cell)
                            .fill_color(to_color32(h.colors[i][j]))
                            .stroke(Stroke::new(1.0, Color32::WHITE)),
                    );
                    let label = r.map_or_else(|| "–".to_string(), |r| format!("{r:.2}"));
                    plot_ui.text(Text::new(
                        PlotPoint::new(x, y),
                        RichText::new(label).color(Color32::BLACK),
                    ));
                }
            }
        });
}
