use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{FrequencyTable, UnitSeries};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a wide frequency table from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – `time` string column plus one numeric column per unit
/// * `.json`    – records orientation: `[{ "time": "...", "A1": 0.2, ... }, ...]`
/// * `.csv`     – header `time,<unit>,<unit>,...`, one row per time point
pub fn load_file(path: &Path) -> Result<FrequencyTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    log::info!(
        "loaded {} units × {} time points from {}",
        table.num_units(),
        table.num_rows(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with a `time` column and one column per unit;
/// every unit cell parses as `f64`. This is the layout emitted by the
/// upstream `generate_frequency_table` preprocessing export.
fn load_csv(path: &Path) -> Result<FrequencyTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let time_idx = headers
        .iter()
        .position(|h| h == "time")
        .context("CSV missing 'time' column")?;

    let unit_names: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != time_idx)
        .map(|(i, h)| (i, h.clone()))
        .collect();

    let mut time: Vec<String> = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); unit_names.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let time_cell = record
            .get(time_idx)
            .with_context(|| format!("CSV row {row_no}: missing 'time' cell"))?;
        time.push(time_cell.to_string());

        for (col, (idx, name)) in unit_names.iter().enumerate() {
            let cell = record
                .get(*idx)
                .with_context(|| format!("CSV row {row_no}: missing cell for unit '{name}'"))?;
            let value: f64 = cell
                .trim()
                .parse()
                .with_context(|| format!("Row {row_no}, unit '{name}': '{cell}' is not a number"))?;
            columns[col].push(value);
        }
    }

    let units = unit_names
        .into_iter()
        .map(|(_, name)| name)
        .zip(columns)
        .map(|(name, values)| UnitSeries::new(name, values))
        .collect();

    FrequencyTable::new(time, units).context("assembling frequency table")
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "time": "2020-01-01T00:00:00", "A1": 0.2, "A2": 1.5 },
///   { "time": "2020-01-01T00:00:01", "A1": 0.4, "A2": 1.1 }
/// ]
/// ```
///
/// The key order of the first record fixes the unit column order; every
/// record must carry the same keys.
fn load_json(path: &Path) -> Result<FrequencyTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;
    if records.is_empty() {
        return FrequencyTable::new(Vec::new(), Vec::new()).context("assembling frequency table");
    }

    let first = records[0]
        .as_object()
        .context("Row 0 is not a JSON object")?;
    if !first.contains_key("time") {
        bail!("JSON records missing 'time' field");
    }
    let unit_names: Vec<String> = first.keys().filter(|k| *k != "time").cloned().collect();

    let mut time: Vec<String> = Vec::with_capacity(records.len());
    let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(records.len()); unit_names.len()];

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let time_value = obj
            .get("time")
            .and_then(|v| v.as_str())
            .with_context(|| format!("Row {i}: missing or non-string 'time'"))?;
        time.push(time_value.to_string());

        for (col, name) in unit_names.iter().enumerate() {
            let value = obj
                .get(name)
                .and_then(|v| v.as_f64())
                .with_context(|| format!("Row {i}: missing or non-numeric value for unit '{name}'"))?;
            columns[col].push(value);
        }
    }

    let units = unit_names
        .into_iter()
        .zip(columns)
        .map(|(name, values)| UnitSeries::new(name, values))
        .collect();

    FrequencyTable::new(time, units).context("assembling frequency table")
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing a wide frequency table.
///
/// Expected schema:
/// - `time`: Utf8 or LargeUtf8 – string-encoded timestamps
/// - every other column: Float64 / Float32 / Int64 / Int32 firing rates
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<FrequencyTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut time: Vec<String> = Vec::new();
    let mut unit_names: Vec<String> = Vec::new();
    let mut columns: Vec<Vec<f64>> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let time_idx = schema
            .index_of("time")
            .map_err(|_| anyhow::anyhow!("Parquet file missing 'time' column"))?;

        let unit_cols: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != time_idx)
            .map(|(i, f)| (i, f.name().clone()))
            .collect();

        // The first batch fixes the unit column order.
        if unit_names.is_empty() {
            unit_names = unit_cols.iter().map(|(_, n)| n.clone()).collect();
            columns = vec![Vec::new(); unit_names.len()];
        }

        extend_string_column(batch.column(time_idx), &mut time)
            .context("reading 'time' column")?;

        for (col, (idx, name)) in unit_cols.iter().enumerate() {
            extend_f64_column(batch.column(*idx), &mut columns[col])
                .with_context(|| format!("reading unit column '{name}'"))?;
        }
    }

    let units = unit_names
        .into_iter()
        .zip(columns)
        .map(|(name, values)| UnitSeries::new(name, values))
        .collect();

    FrequencyTable::new(time, units).context("assembling frequency table")
}

// -- Parquet / Arrow helpers --

fn extend_string_column(col: &Arc<dyn Array>, out: &mut Vec<String>) -> Result<()> {
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            for i in 0..arr.len() {
                if arr.is_null(i) {
                    bail!("null timestamp at row {i}");
                }
                out.push(arr.value(i).to_string());
            }
        }
        DataType::LargeUtf8 => {
            let arr = col.as_string::<i64>();
            for i in 0..arr.len() {
                if arr.is_null(i) {
                    bail!("null timestamp at row {i}");
                }
                out.push(arr.value(i).to_string());
            }
        }
        other => bail!("Expected Utf8 'time' column, got {other:?}"),
    }
    Ok(())
}

fn extend_f64_column(col: &Arc<dyn Array>, out: &mut Vec<f64>) -> Result<()> {
    match col.data_type() {
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            out.extend(arr.iter().map(|v| v.unwrap_or(f64::NAN)));
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            out.extend(arr.iter().map(|v| v.map(f64::from).unwrap_or(f64::NAN)));
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            out.extend(arr.iter().map(|v| v.map(|i| i as f64).unwrap_or(f64::NAN)));
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            out.extend(arr.iter().map(|v| v.map(f64::from).unwrap_or(f64::NAN)));
        }
        other => bail!("Expected a numeric unit column, got {other:?}"),
    }
    Ok(())
}
