use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Date32Type, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Column, ColumnKind, Dataset};

/// Cell texts read as missing, matching the Pandas `read_csv` defaults.
const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a tabular dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row followed by one record per line
/// * `.json`    – `[{ "col": value, ... }, ...]`
/// * `.parquet` – flat columns of strings, integers, floats, booleans or dates
///
/// Files larger than `max_bytes` and tables without columns are rejected.
pub fn load_file(path: &Path, max_bytes: u64) -> Result<Dataset> {
    let size = std::fs::metadata(path)
        .with_context(|| format!("reading metadata of {}", path.display()))?
        .len();
    if size > max_bytes {
        bail!(
            "{} is {size} bytes, larger than the {max_bytes} byte limit",
            path.display()
        );
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            load_csv_reader(file)?
        }
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    if dataset.column_count() == 0 {
        bail!("{} contains no columns", path.display());
    }

    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        dataset.row_count(),
        dataset.column_names(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, then one record per row.
/// Every record must have as many fields as the header.
pub fn load_csv_reader<R: Read>(input: R) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let headers = dedup_headers(headers);

    let mut fields: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() != headers.len() {
            bail!(
                "CSV row {row_no} has {} fields, expected {}",
                record.len(),
                headers.len()
            );
        }
        for (slot, field) in fields.iter_mut().zip(record.iter()) {
            slot.push(field.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(&fields)
        .map(|(name, texts)| text_column(name, texts))
        .collect();
    Dataset::new(columns).context("assembling CSV columns")
}

/// Types one CSV column. A column that ends up categorical keeps the field
/// text verbatim, so `007` and `7` stay distinct values.
fn text_column(name: String, texts: &[String]) -> Column {
    let typed = Column::new(name, texts.iter().map(|t| guess_cell_type(t)).collect());
    if typed.kind != ColumnKind::Categorical {
        return typed;
    }
    let raw = texts
        .iter()
        .map(|t| {
            if is_missing_token(t) {
                CellValue::Null
            } else {
                CellValue::String(t.clone())
            }
        })
        .collect();
    Column::new(typed.name, raw)
}

/// Rename repeated headers to `name.1`, `name.2`, ...
fn dedup_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(headers.len());
    for h in headers {
        let mut name = h.clone();
        while let Some(n) = seen.get_mut(&name) {
            *n += 1;
            name = format!("{h}.{n}");
        }
        seen.insert(name.clone(), 0);
        out.push(name);
    }
    out
}

fn is_missing_token(raw: &str) -> bool {
    MISSING_TOKENS.contains(&raw)
}

fn guess_cell_type(raw: &str) -> CellValue {
    if is_missing_token(raw) {
        return CellValue::Null;
    }
    let s = raw.trim();
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::float(f);
    }
    match s {
        "true" | "True" | "TRUE" => return CellValue::Bool(true),
        "false" | "False" | "FALSE" => return CellValue::Bool(false),
        _ => {}
    }
    if looks_like_iso_date(s) {
        return CellValue::Date(s.to_string());
    }
    CellValue::String(raw.to_string())
}

/// `YYYY-MM-DD`, optionally followed by `T` or a space and a time.
fn looks_like_iso_date(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() < 10 {
        return false;
    }
    let date_ok = bytes[..10].iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    date_ok && (bytes.len() == 10 || matches!(bytes[10], b'T' | b' '))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "city": "Paris", "age": 31 },
///   { "city": "Lyon",  "age": null }
/// ]
/// ```
///
/// Columns appear in first-seen key order; a key absent from a record is missing.
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    load_json_str(&text)
}

pub fn load_json_str(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map_or(CellValue::Null, json_to_cell))
                .collect()
        })
        .collect();

    Dataset::from_rows(headers, rows).context("assembling JSON columns")
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) if looks_like_iso_date(s) => CellValue::Date(s.clone()),
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing a flat table.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Unsupported column types are read as
/// their type name so the column still shows up as categorical.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); names.len()];

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, slot) in cells.iter_mut().enumerate() {
            let col_array = batch.column(col_idx);
            slot.extend((0..batch.num_rows()).map(|row| extract_cell_value(col_array, row)));
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    Dataset::new(columns).context("assembling parquet columns")
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell_value(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let value = match col.data_type() {
        DataType::Utf8 => col
            .as_string_opt::<i32>()
            .map(|a| CellValue::String(a.value(row).to_string())),
        DataType::LargeUtf8 => col
            .as_string_opt::<i64>()
            .map(|a| CellValue::String(a.value(row).to_string())),
        DataType::Int32 => col
            .as_primitive_opt::<Int32Type>()
            .map(|a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int64 => col
            .as_primitive_opt::<Int64Type>()
            .map(|a| CellValue::Integer(a.value(row))),
        DataType::Float32 => col
            .as_primitive_opt::<Float32Type>()
            .map(|a| CellValue::float(a.value(row) as f64)),
        DataType::Float64 => col
            .as_primitive_opt::<Float64Type>()
            .map(|a| CellValue::float(a.value(row))),
        DataType::Boolean => col.as_boolean_opt().map(|a| CellValue::Bool(a.value(row))),
        DataType::Date32 => col
            .as_primitive_opt::<Date32Type>()
            .and_then(|a| a.value_as_date(row))
            .map(|d| CellValue::Date(d.to_string())),
        other => Some(CellValue::String(format!("{other:?}"))),
    };
    value.unwrap_or(CellValue::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::profile;
    use crate::stats::value_counts;

    #[test]
    fn csv_types_are_inferred_per_column() {
        let csv = "name,score,active,joined\nAlice,1.5,true,2024-01-02\nBob,NA,false,2024-02-03\n";
        let ds = load_csv_reader(csv.as_bytes()).unwrap();
        let kinds: Vec<ColumnKind> = ds.columns().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnKind::Categorical,
                ColumnKind::Numeric,
                ColumnKind::Other,
                ColumnKind::Other
            ]
        );
        assert_eq!(ds.column("score").unwrap().missing_count(), 1);
    }

    #[test]
    fn missing_tokens_become_null() {
        for token in ["", "NaN", "null", "N/A", "<NA>"] {
            assert_eq!(guess_cell_type(token), CellValue::Null, "token {token:?}");
        }
        assert_eq!(guess_cell_type("7"), CellValue::Integer(7));
        assert_eq!(guess_cell_type(" 2.5"), CellValue::Float(2.5));
        assert_eq!(guess_cell_type("Paris"), CellValue::String("Paris".into()));
    }

    #[test]
    fn iso_dates_are_detected() {
        assert!(looks_like_iso_date("2024-03-01"));
        assert!(looks_like_iso_date("2024-03-01T10:00:00"));
        assert!(looks_like_iso_date("2024-03-01 10:00"));
        assert!(!looks_like_iso_date("2024/03/01"));
        assert!(!looks_like_iso_date("2024-03-01x"));
    }

    #[test]
    fn categorical_columns_keep_the_field_text() {
        let ds = load_csv_reader("code,n\n007,1\n7,2\nabc,3\n".as_bytes()).unwrap();
        let code = ds.column("code").unwrap();
        assert_eq!(code.kind, ColumnKind::Categorical);
        assert_eq!(code.values[0], CellValue::String("007".into()));
        let counts: Vec<usize> = value_counts(&code.values).iter().map(|(_, n)| *n).collect();
        assert_eq!(counts, vec![1, 1, 1]);
    }

    #[test]
    fn numeric_looking_categories_are_labelled_as_written() {
        let ds = load_csv_reader("v\n1.0\n1\nx\nNA\n".as_bytes()).unwrap();
        let v = ds.column("v").unwrap();
        let labels: Vec<String> = value_counts(&v.values).iter().map(|(c, _)| c.to_string()).collect();
        assert_eq!(labels, vec!["1.0", "1", "x"]);
        assert_eq!(v.missing_count(), 1);
    }

    #[test]
    fn rows_differing_only_in_code_text_are_distinct() {
        let ds = load_csv_reader("code,tag\n007,a\n7,a\nabc,b\n".as_bytes()).unwrap();
        assert_eq!(profile(&ds).duplicate_rows, 0);
    }

    #[test]
    fn booleans_with_gaps_read_as_categorical_text() {
        let ds = load_csv_reader("flag,n\nTrue,1\n,2\nFalse,3\n".as_bytes()).unwrap();
        let flag = ds.column("flag").unwrap();
        assert_eq!(flag.kind, ColumnKind::Categorical);
        assert_eq!(flag.values[0], CellValue::String("True".into()));
        assert_eq!(profile(&ds).categorical_columns, vec!["flag"]);
    }

    #[test]
    fn duplicate_headers_are_renamed() {
        let ds = load_csv_reader("a,a,b,a\n1,2,3,4\n".as_bytes()).unwrap();
        assert_eq!(ds.column_names(), vec!["a", "a.1", "b", "a.2"]);
    }

    #[test]
    fn ragged_csv_is_an_error() {
        assert!(load_csv_reader("a,b\n1,2\n3\n".as_bytes()).is_err());
    }

    #[test]
    fn header_only_csv_has_zero_rows() {
        let ds = load_csv_reader("x,y\n".as_bytes()).unwrap();
        assert_eq!(ds.row_count(), 0);
        assert_eq!(ds.column_count(), 2);
    }

    #[test]
    fn json_records_keep_key_order_and_fill_gaps() {
        let ds = load_json_str(r#"[{"b": 1, "a": "x"}, {"a": "y"}]"#).unwrap();
        assert_eq!(ds.column_names(), vec!["b", "a"]);
        assert_eq!(ds.column("b").unwrap().values[1], CellValue::Null);
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        assert!(load_json_str(r#"{"a": 1}"#).is_err());
        assert!(load_json_str(r#"[1, 2]"#).is_err());
    }
}
