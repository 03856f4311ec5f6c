use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};

use super::LoaderError;

/// Cell values read as missing
const NULL_TOKENS: [&str; 2] = ["", "NA"];

fn is_null(value: &str) -> bool {
    NULL_TOKENS.contains(&value)
}

fn parses_as_float(value: &str) -> bool {
    // Rejects "inf"/"NaN" which `f64::from_str` accepts
    value.bytes().any(|b| b.is_ascii_digit()) && value.parse::<f64>().is_ok()
}

/// Narrowest of Int64, Float64 and Utf8 that holds every non-null value.
///
/// An all-null column is typed Utf8.
pub fn infer_type<'a, I>(values: I) -> DataType
where
    I: IntoIterator<Item = &'a str>,
{
    let mut data_type: Option<DataType> = None;
    for value in values.into_iter().filter(|v| !is_null(v)) {
        let fits = if value.parse::<i64>().is_ok() {
            DataType::Int64
        } else if parses_as_float(value) {
            DataType::Float64
        } else {
            return DataType::Utf8;
        };
        data_type = match (data_type, fits) {
            (Some(DataType::Float64), _) | (_, DataType::Float64) => Some(DataType::Float64),
            _ => Some(DataType::Int64),
        };
    }
    data_type.unwrap_or(DataType::Utf8)
}

fn build_array(values: &[Option<String>], data_type: &DataType) -> ArrayRef {
    fn present(v: &Option<String>) -> Option<&str> {
        v.as_deref().filter(|v| !is_null(v))
    }
    match data_type {
        DataType::Int64 => Arc::new(
            values
                .iter()
                .map(|v| present(v).and_then(|v| v.parse::<i64>().ok()))
                .collect::<Int64Array>(),
        ),
        DataType::Float64 => Arc::new(
            values
                .iter()
                .map(|v| present(v).and_then(|v| v.parse::<f64>().ok()))
                .collect::<Float64Array>(),
        ),
        _ => Arc::new(values.iter().map(present).collect::<StringArray>()),
    }
}

/// Parse a tab-separated table into a single record batch.
///
/// Lines starting with `#` are skipped; the first remaining line is the header. Short
/// rows are padded with nulls and extra fields are ignored. Each column is typed by
/// [`infer_type`].
pub fn read_tsv<R: Read>(reader: R) -> Result<RecordBatch, LoaderError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .comment(Some(b'#'))
        .quoting(false)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    let mut rows = 0;
    for record in csv_reader.records() {
        let record = record?;
        for (i, column) in columns.iter_mut().enumerate() {
            column.push(record.get(i).map(|v| v.trim().to_string()));
        }
        rows += 1;
    }

    let mut fields = Vec::with_capacity(headers.len());
    let mut arrays = Vec::with_capacity(headers.len());
    for (name, values) in headers.into_iter().zip(&columns) {
        let data_type = infer_type(values.iter().filter_map(|v| v.as_deref()));
        arrays.push(build_array(values, &data_type));
        fields.push(Field::new(name, data_type, true));
    }

    let options = RecordBatchOptions::new().with_row_count(Some(rows));
    Ok(RecordBatch::try_new_with_options(
        Arc::new(Schema::new(fields)),
        arrays,
        &options,
    )?)
}

/// Parse a tab-separated file, see [`read_tsv`].
pub fn read_tsv_file<P: AsRef<Path>>(path: P) -> Result<RecordBatch, LoaderError> {
    let path = path.as_ref();
    let batch = read_tsv(File::open(path)?)?;
    if batch.num_columns() == 0 {
        return Err(LoaderError::EmptyTable(path.to_path_buf()));
    }
    Ok(batch)
}
