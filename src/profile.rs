//! Dataset-level profiling: shape, column-type partition, missing cells and
//! duplicate rows.

use std::collections::HashSet;

use serde::Serialize;

use crate::data::model::{ColumnKind, Dataset};

/// Immutable summary of a [`Dataset`], computed once per analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub rows: usize,
    pub columns: usize,
    /// Numeric column names in header order.
    pub numeric_columns: Vec<String>,
    /// Categorical column names in header order.
    pub categorical_columns: Vec<String>,
    /// Missing cells across the whole table.
    pub missing_values: usize,
    /// Rows equal to an earlier row in every column.
    pub duplicate_rows: usize,
}

impl Profile {
    /// Share of missing cells in percent, `None` for an empty table.
    pub fn missing_percent(&self) -> Option<f64> {
        let cells = self.rows * self.columns;
        (cells > 0).then(|| self.missing_values as f64 / cells as f64 * 100.0)
    }
}

/// Profiles a dataset. Total: empty tables give zero counts.
pub fn profile(dataset: &Dataset) -> Profile {
    let names_of = |kind: ColumnKind| -> Vec<String> {
        dataset
            .columns()
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.name.clone())
            .collect()
    };

    let profile = Profile {
        rows: dataset.row_count(),
        columns: dataset.column_count(),
        numeric_columns: names_of(ColumnKind::Numeric),
        categorical_columns: names_of(ColumnKind::Categorical),
        missing_values: dataset.columns().iter().map(|c| c.missing_count()).sum(),
        duplicate_rows: count_duplicate_rows(dataset),
    };
    log::debug!("{profile:?}");
    profile
}

fn count_duplicate_rows(dataset: &Dataset) -> usize {
    if dataset.column_count() == 0 {
        return 0;
    }
    let mut seen = HashSet::with_capacity(dataset.row_count());
    (0..dataset.row_count())
        .filter(|&r| !seen.insert(dataset.row(r)))
        .count()
}
