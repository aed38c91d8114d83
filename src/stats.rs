//! Descriptive statistics used by the insight rules and the chart builders.
//!
//! Every function is total: inputs too small for a statistic yield `None`
//! instead of NaN or a panic.

use crate::data::model::CellValue;

/// Mean, sample standard deviation and range of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (divisor `n - 1`); `None` below 2 values.
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

pub fn summarize(values: &[f64]) -> Summary {
    Summary {
        count: values.len(),
        mean: u_numflow::stats::mean(values),
        std_dev: u_numflow::stats::std_dev(values),
        min: u_numflow::stats::min(values),
        max: u_numflow::stats::max(values),
    }
}

// ── Correlation ───────────────────────────────────────────────────────

/// Keeps the rows where both sides are present.
fn complete_pairs(x: &[Option<f64>], y: &[Option<f64>]) -> (Vec<f64>, Vec<f64>) {
    x.iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .unzip()
}

/// Pearson correlation over pairwise-complete observations.
///
/// Rows where either side is `None` are skipped. Returns `None` with fewer
/// than three complete pairs or when either side has zero variance.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let (xs, ys) = complete_pairs(x, y);
    u_analytics::correlation::pearson(&xs, &ys).map(|result| result.r)
}

/// Symmetric pairwise Pearson matrix. The diagonal is `1.0` for any column
/// with a defined self-correlation and `None` otherwise.
pub fn correlation_matrix(columns: &[Vec<Option<f64>>]) -> Vec<Vec<Option<f64>>> {
    let n = columns.len();
    let mut matrix = vec![vec![None; n]; n];
    for i in 0..n {
        matrix[i][i] = pearson(&columns[i], &columns[i]).map(|_| 1.0);
        for j in (i + 1)..n {
            let r = pearson(&columns[i], &columns[j]);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    matrix
}

// ── Regression ────────────────────────────────────────────────────────

/// Ordinary least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fits an OLS line through `points`. `None` with fewer than three points or
/// a constant `x`.
pub fn linear_fit(points: &[[f64; 2]]) -> Option<LinearFit> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = points.iter().map(|p| (p[0], p[1])).unzip();
    u_analytics::regression::simple_linear_regression(&xs, &ys).map(|result| LinearFit {
        slope: result.slope,
        intercept: result.intercept,
    })
}

// ── Frequencies ───────────────────────────────────────────────────────

/// One equal-width histogram bucket; the last bucket includes its upper edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Splits `values` into `n_bins` equal-width buckets over `[min, max]`.
///
/// A constant sample is centred in `[v - 0.5, v + 0.5]`. Empty input or
/// `n_bins == 0` gives no buckets.
pub fn histogram(values: &[f64], n_bins: usize) -> Vec<Bin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let (Some(min), Some(max)) = (
        finite.iter().copied().reduce(f64::min),
        finite.iter().copied().reduce(f64::max),
    ) else {
        return Vec::new();
    };
    if n_bins == 0 {
        return Vec::new();
    }

    let (lo, hi) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let width = (hi - lo) / n_bins as f64;

    let mut counts = vec![0usize; n_bins];
    for v in &finite {
        let idx = (((v - lo) / width) as usize).min(n_bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            lower: lo + width * i as f64,
            upper: if i + 1 == n_bins {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count,
        })
        .collect()
}

/// Frequency of each distinct non-missing value, most frequent first.
///
/// Equal counts keep first-encountered order, so the head of the list is the
/// mode with a deterministic tie-break.
pub fn value_counts(values: &[CellValue]) -> Vec<(&CellValue, usize)> {
    let mut counts: Vec<(&CellValue, usize)> = Vec::new();
    let mut index: std::collections::HashMap<&CellValue, usize> = std::collections::HashMap::new();
    for v in values.iter().filter(|v| !v.is_missing()) {
        match index.get(v) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(v, counts.len());
                counts.push((v, 1));
            }
        }
    }
    // `sort_by` is stable: ties stay in first-seen order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
