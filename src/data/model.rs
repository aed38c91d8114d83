use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common Pandas dtypes.
/// Rows are hashed for duplicate detection, so `CellValue` must be `Eq + Hash`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 date string kept as text for simplicity.
    Date(String),
    Null,
}

// -- Manual Eq/Ord so whole rows can go into hash sets and sorted maps --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
                Date(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) | (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) | CellValue::Date(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => write!(f, "NaN"),
        }
    }
}

impl CellValue {
    /// Builds a float cell, mapping NaN to `Null` and `-0.0` to `0.0` so that
    /// bitwise hashing agrees with numeric equality.
    pub fn float(v: f64) -> Self {
        if v.is_nan() {
            CellValue::Null
        } else if v == 0.0 {
            CellValue::Float(0.0)
        } else {
            CellValue::Float(v)
        }
    }

    /// Try to interpret the value as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Integer(_) | CellValue::Float(_))
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// Inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Every non-missing value is a number.
    Numeric,
    /// Textual or mixed values.
    Categorical,
    /// Booleans, dates and anything else excluded from the analysis lists.
    Other,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
            ColumnKind::Other => write!(f, "other"),
        }
    }
}

/// A named, typed column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<CellValue>,
}

impl Column {
    /// Build a column and infer its kind from the values.
    ///
    /// A column without any non-missing value is numeric, the way an
    /// all-empty CSV column reads as a float column. Numeric columns have
    /// their integers widened to floats so mixed `1` / `1.0` compare equal.
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        let kind = infer_kind(&values);
        let values = if kind == ColumnKind::Numeric {
            values
                .into_iter()
                .map(|v| match v.as_f64() {
                    Some(f) => CellValue::float(f),
                    None => CellValue::Null,
                })
                .collect()
        } else {
            values
        };
        Column {
            name: name.into(),
            kind,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing()).count()
    }

    /// Non-missing numeric values in row order.
    pub fn numbers(&self) -> Vec<f64> {
        self.values.iter().filter_map(CellValue::as_f64).collect()
    }

    /// Per-row numeric view, `None` where the cell is missing or not a number.
    pub fn numeric_cells(&self) -> Vec<Option<f64>> {
        self.values.iter().map(CellValue::as_f64).collect()
    }
}

fn infer_kind(values: &[CellValue]) -> ColumnKind {
    let present = || values.iter().filter(|v| !v.is_missing());

    // A boolean column with gaps cannot stay boolean, so it reads as text.
    if present().all(CellValue::is_numeric) {
        ColumnKind::Numeric
    } else if values.iter().all(|v| matches!(v, CellValue::Bool(_)))
        || present().all(|v| matches!(v, CellValue::Date(_)))
    {
        ColumnKind::Other
    } else {
        ColumnKind::Categorical
    }
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    #[error("column '{column}' has {actual} values, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// The full tabular dataset: ordered columns of equal length.
///
/// Never mutated once built; every analysis component borrows it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    pub fn new(columns: Vec<Column>) -> Result<Self, DatasetError> {
        let rows = columns.first().map_or(0, Column::len);
        let mut seen = HashSet::new();
        for col in &columns {
            if col.len() != rows {
                return Err(DatasetError::RaggedColumn {
                    column: col.name.clone(),
                    expected: rows,
                    actual: col.len(),
                });
            }
            if !seen.insert(col.name.as_str()) {
                return Err(DatasetError::DuplicateColumn(col.name.clone()));
            }
        }
        Ok(Dataset { columns, rows })
    }

    /// Build from row-major cells, inferring each column's kind.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self, DatasetError> {
        let width = headers.len();
        let mut cells: Vec<Vec<CellValue>> = (0..width).map(|_| Vec::with_capacity(rows.len())).collect();
        for (row_no, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(DatasetError::RaggedRow {
                    row: row_no,
                    expected: width,
                    actual: row.len(),
                });
            }
            for (slot, value) in cells.iter_mut().zip(row) {
                slot.push(value);
            }
        }
        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, values)| Column::new(name, values))
            .collect();
        Dataset::new(columns)
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Numeric columns in header order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.kind == ColumnKind::Numeric)
    }

    /// Borrowed view of row `idx` across all columns.
    pub fn row(&self, idx: usize) -> Vec<&CellValue> {
        self.columns.iter().map(|c| &c.values[idx]).collect()
    }

    /// The first `n` rows rendered as display strings.
    pub fn head(&self, n: usize) -> Vec<Vec<String>> {
        (0..n.min(self.rows))
            .map(|r| self.columns.iter().map(|c| c.values[r].to_string()).collect())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    #[test]
    fn integers_and_floats_make_a_numeric_column() {
        let col = Column::new(
            "n",
            vec![CellValue::Integer(1), CellValue::Null, CellValue::Float(2.5)],
        );
        assert_eq!(col.kind, ColumnKind::Numeric);
        assert_eq!(col.values[0], CellValue::Float(1.0));
        assert_eq!(col.numbers(), vec![1.0, 2.5]);
        assert_eq!(col.missing_count(), 1);
    }

    #[test]
    fn all_missing_column_is_numeric() {
        let col = Column::new("empty", vec![CellValue::Null, CellValue::Null]);
        assert_eq!(col.kind, ColumnKind::Numeric);
        assert!(col.numbers().is_empty());
    }

    #[test]
    fn mixed_text_and_numbers_is_categorical() {
        let col = Column::new("mixed", vec![CellValue::Integer(3), s("three")]);
        assert_eq!(col.kind, ColumnKind::Categorical);
        assert_eq!(col.values[0], CellValue::Integer(3));
    }

    #[test]
    fn booleans_and_dates_are_other() {
        let bools = Column::new("flag", vec![CellValue::Bool(true), CellValue::Bool(false)]);
        let dates = Column::new("day", vec![CellValue::Date("2024-01-01".into()), CellValue::Null]);
        assert_eq!(bools.kind, ColumnKind::Other);
        assert_eq!(dates.kind, ColumnKind::Other);
    }

    #[test]
    fn booleans_with_missing_cells_are_categorical() {
        let bools = Column::new("flag", vec![CellValue::Bool(true), CellValue::Null]);
        assert_eq!(bools.kind, ColumnKind::Categorical);
        assert_eq!(bools.missing_count(), 1);
    }

    #[test]
    fn negative_zero_is_normalised() {
        assert_eq!(CellValue::float(-0.0), CellValue::Float(0.0));
        assert_eq!(CellValue::float(f64::NAN), CellValue::Null);
    }

    #[test]
    fn dataset_rejects_ragged_columns() {
        let err = Dataset::new(vec![
            Column::new("a", vec![CellValue::Integer(1)]),
            Column::new("b", vec![]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            DatasetError::RaggedColumn {
                column: "b".into(),
                expected: 1,
                actual: 0
            }
        );
    }

    #[test]
    fn dataset_rejects_duplicate_names() {
        let err = Dataset::new(vec![
            Column::new("a", vec![CellValue::Integer(1)]),
            Column::new("a", vec![CellValue::Integer(2)]),
        ])
        .unwrap_err();
        assert_eq!(err, DatasetError::DuplicateColumn("a".into()));
    }

    #[test]
    fn from_rows_transposes() {
        let ds = Dataset::from_rows(
            vec!["x".into(), "label".into()],
            vec![
                vec![CellValue::Integer(1), s("a")],
                vec![CellValue::Integer(2), s("b")],
            ],
        )
        .unwrap();
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.column_count(), 2);
        assert_eq!(ds.row(1), vec![&CellValue::Float(2.0), &s("b")]);
        assert_eq!(ds.head(1), vec![vec!["1".to_string(), "a".to_string()]]);
    }

    #[test]
    fn empty_dataset_has_zero_counts() {
        let ds = Dataset::new(Vec::new()).unwrap();
        assert_eq!(ds.row_count(), 0);
        assert_eq!(ds.column_count(), 0);
        assert!(ds.is_empty());
    }
}
