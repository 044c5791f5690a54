use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Application, ApplicationDataset};

/// Column names of the source table.
pub const COL_STATE: &str = "damagedStateAbbreviation";
pub const COL_RESIDENCE: &str = "residenceType";
pub const COL_TSA: &str = "tsaEligible";
pub const COL_REPAIR: &str = "repairAmount";

const REQUIRED_COLUMNS: [&str; 4] = [COL_STATE, COL_RESIDENCE, COL_TSA, COL_REPAIR];

// ---------------------------------------------------------------------------
// LoadError
// ---------------------------------------------------------------------------

/// Any failure while reading or validating the source file.
///
/// Fatal to rendering: the app shows the message and produces no further
/// output for the session. Never retried.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("opening {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reading parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("reading parquet batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("malformed input: {0}")]
    Malformed(String),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}: column '{column}': {message}")]
    BadValue {
        row: usize,
        column: &'static str,
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the application dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the four named columns
/// * `.json`    – records-oriented array of objects
/// * `.parquet` – flat scalar columns, as written by pandas or polars
pub fn load_file(path: &Path) -> Result<ApplicationDataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

static DATASET: OnceLock<Result<ApplicationDataset, LoadError>> = OnceLock::new();

/// Load the dataset exactly once per process lifetime.
///
/// The first call performs the read; every later call returns the cached
/// outcome without touching the filesystem again. There is no transition
/// back to the unloaded state.
pub fn load_cached(path: &Path) -> Result<&'static ApplicationDataset, &'static LoadError> {
    DATASET.get_or_init(|| load_file(path)).as_ref()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<ApplicationDataset, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv(file)
}

/// Parse CSV from any reader.  Header presence is validated up front; an
/// empty cell is a null, a non-numeric cell in a numeric column is an error.
fn read_csv<R: io::Read>(input: R) -> Result<ApplicationDataset, LoadError> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader.headers()?.clone();

    let state_idx = column_index(&headers, COL_STATE)?;
    let residence_idx = column_index(&headers, COL_RESIDENCE)?;
    let tsa_idx = column_index(&headers, COL_TSA)?;
    let repair_idx = column_index(&headers, COL_REPAIR)?;

    let mut applications = Vec::new();

    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let state = non_empty(record.get(state_idx));
        let residence = non_empty(record.get(residence_idx));
        let tsa = parse_flag(record.get(tsa_idx), row, COL_TSA)?;
        let repair = parse_amount(record.get(repair_idx), row, COL_REPAIR)?;
        applications.push(Application::new(state, residence, tsa, repair));
    }

    Ok(ApplicationDataset::from_applications(applications))
}

fn column_index(headers: &csv::StringRecord, name: &'static str) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or(LoadError::MissingColumn(name))
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse an integer flag cell.  Accepts `1` as well as the `1.0` pandas
/// writes when the column carries nulls.
fn parse_flag(raw: Option<&str>, row: usize, column: &'static str) -> Result<Option<i64>, LoadError> {
    let Some(text) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let value: f64 = text.parse().map_err(|_| LoadError::BadValue {
        row,
        column,
        message: format!("'{text}' is not a number"),
    })?;
    if value.fract() != 0.0 {
        return Err(LoadError::BadValue {
            row,
            column,
            message: format!("'{text}' is not an integer"),
        });
    }
    Ok(Some(value as i64))
}

fn parse_amount(
    raw: Option<&str>,
    row: usize,
    column: &'static str,
) -> Result<Option<f64>, LoadError> {
    let Some(text) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let value: f64 = text.parse().map_err(|_| LoadError::BadValue {
        row,
        column,
        message: format!("'{text}' is not a number"),
    })?;
    Ok(Some(value))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "damagedStateAbbreviation": "TX",
///     "residenceType": "Apartment",
///     "tsaEligible": 1,
///     "repairAmount": 1234.5
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<ApplicationDataset, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_json(&text)
}

fn read_json(text: &str) -> Result<ApplicationDataset, LoadError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let records = root
        .as_array()
        .ok_or_else(|| LoadError::Malformed("expected top-level JSON array".to_string()))?;

    // A key missing from one record is a null; a key missing from every
    // record is a schema mismatch.
    let mut seen_keys: BTreeSet<&str> = BTreeSet::new();

    let mut applications = Vec::with_capacity(records.len());

    for (row, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::Malformed(format!("row {row} is not a JSON object")))?;
        for column in REQUIRED_COLUMNS {
            if obj.contains_key(column) {
                seen_keys.insert(column);
            }
        }

        let state = json_string(obj.get(COL_STATE), row, COL_STATE)?;
        let residence = json_string(obj.get(COL_RESIDENCE), row, COL_RESIDENCE)?;
        let tsa = json_flag(obj.get(COL_TSA), row, COL_TSA)?;
        let repair = json_number(obj.get(COL_REPAIR), row, COL_REPAIR)?;
        applications.push(Application::new(state, residence, tsa, repair));
    }

    if !records.is_empty() {
        for column in REQUIRED_COLUMNS {
            if !seen_keys.contains(column) {
                return Err(LoadError::MissingColumn(column));
            }
        }
    }

    Ok(ApplicationDataset::from_applications(applications))
}

fn json_string(
    val: Option<&JsonValue>,
    row: usize,
    column: &'static str,
) -> Result<Option<String>, LoadError> {
    match val {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(non_empty(Some(s))),
        Some(other) => Err(LoadError::BadValue {
            row,
            column,
            message: format!("expected string, got {other}"),
        }),
    }
}

fn json_number(
    val: Option<&JsonValue>,
    row: usize,
    column: &'static str,
) -> Result<Option<f64>, LoadError> {
    match val {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Number(n)) => Ok(n.as_f64()),
        Some(other) => Err(LoadError::BadValue {
            row,
            column,
            message: format!("expected number, got {other}"),
        }),
    }
}

fn json_flag(
    val: Option<&JsonValue>,
    row: usize,
    column: &'static str,
) -> Result<Option<i64>, LoadError> {
    let Some(number) = json_number(val, row, column)? else {
        return Ok(None);
    };
    if number.fract() != 0.0 {
        return Err(LoadError::BadValue {
            row,
            column,
            message: format!("'{number}' is not an integer"),
        });
    }
    Ok(Some(number as i64))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a parquet file with flat scalar columns.
///
/// Works with files written by both **pandas** (`df.to_parquet()`) and
/// **polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<ApplicationDataset, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let reader = builder.build()?;

    let mut applications = Vec::new();
    let mut row_base = 0usize;

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        let state_idx = schema
            .index_of(COL_STATE)
            .map_err(|_| LoadError::MissingColumn(COL_STATE))?;
        let residence_idx = schema
            .index_of(COL_RESIDENCE)
            .map_err(|_| LoadError::MissingColumn(COL_RESIDENCE))?;
        let tsa_idx = schema
            .index_of(COL_TSA)
            .map_err(|_| LoadError::MissingColumn(COL_TSA))?;
        let repair_idx = schema
            .index_of(COL_REPAIR)
            .map_err(|_| LoadError::MissingColumn(COL_REPAIR))?;

        for row in 0..batch.num_rows() {
            let state = string_at(batch.column(state_idx), row, row_base + row, COL_STATE)?;
            let residence = string_at(
                batch.column(residence_idx),
                row,
                row_base + row,
                COL_RESIDENCE,
            )?;
            let tsa = int_at(batch.column(tsa_idx), row, row_base + row, COL_TSA)?;
            let repair = float_at(batch.column(repair_idx), row, row_base + row, COL_REPAIR)?;
            applications.push(Application::new(state, residence, tsa, repair));
        }
        row_base += batch.num_rows();
    }

    Ok(ApplicationDataset::from_applications(applications))
}

// -- Arrow column helpers --

fn string_at(
    col: &Arc<dyn Array>,
    row: usize,
    abs_row: usize,
    column: &'static str,
) -> Result<Option<String>, LoadError> {
    if col.is_null(row) {
        return Ok(None);
    }
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            if let Some(arr) = col.as_any().downcast_ref::<StringArray>() {
                Ok(non_empty(Some(arr.value(row))))
            } else {
                // LargeStringArray
                let arr = col.as_string::<i64>();
                Ok(non_empty(Some(arr.value(row))))
            }
        }
        other => Err(LoadError::BadValue {
            row: abs_row,
            column,
            message: format!("expected string column, got {other:?}"),
        }),
    }
}

fn int_at(
    col: &Arc<dyn Array>,
    row: usize,
    abs_row: usize,
    column: &'static str,
) -> Result<Option<i64>, LoadError> {
    if col.is_null(row) {
        return Ok(None);
    }
    match col.data_type() {
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            Ok(Some(arr.value(row)))
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            Ok(Some(arr.value(row) as i64))
        }
        // pandas promotes int columns with nulls to float
        DataType::Float64 | DataType::Float32 => {
            let value = float_at(col, row, abs_row, column)?.unwrap_or(f64::NAN);
            if value.fract() != 0.0 {
                return Err(LoadError::BadValue {
                    row: abs_row,
                    column,
                    message: format!("'{value}' is not an integer"),
                });
            }
            Ok(Some(value as i64))
        }
        other => Err(LoadError::BadValue {
            row: abs_row,
            column,
            message: format!("expected integer column, got {other:?}"),
        }),
    }
}

fn float_at(
    col: &Arc<dyn Array>,
    row: usize,
    abs_row: usize,
    column: &'static str,
) -> Result<Option<f64>, LoadError> {
    if col.is_null(row) {
        return Ok(None);
    }
    match col.data_type() {
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            Ok(Some(arr.value(row)))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            Ok(Some(arr.value(row) as f64))
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            Ok(Some(arr.value(row) as f64))
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            Ok(Some(arr.value(row) as f64))
        }
        other => Err(LoadError::BadValue {
            row: abs_row,
            column,
            message: format!("expected numeric column, got {other:?}"),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::EligibilityLabel;

    const CSV: &str = "\
damagedStateAbbreviation,residenceType,tsaEligible,repairAmount
TX,Apartment,1,1000.0
TX,House/Duplex,0,2000.5
FL,Apartment,1,3000.0
";

    #[test]
    fn csv_happy_path_derives_labels() {
        let dataset = read_csv(CSV.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.states, vec!["FL".to_string(), "TX".to_string()]);
        assert_eq!(
            dataset.applications[0].label,
            Some(EligibilityLabel::Eligible)
        );
        assert_eq!(
            dataset.applications[1].label,
            Some(EligibilityLabel::NotEligible)
        );
        assert_eq!(dataset.applications[1].repair_amount, Some(2000.5));
    }

    #[test]
    fn csv_empty_cells_become_nulls() {
        let csv = "\
damagedStateAbbreviation,residenceType,tsaEligible,repairAmount
,Apartment,,1000.0
TX,, 1 ,
";
        let dataset = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(dataset.applications[0].state, None);
        assert_eq!(dataset.applications[0].tsa_eligible, None);
        assert_eq!(dataset.applications[0].label, None);
        assert_eq!(dataset.applications[1].residence_type, None);
        assert_eq!(dataset.applications[1].tsa_eligible, Some(1));
        assert_eq!(dataset.applications[1].repair_amount, None);
    }

    #[test]
    fn csv_missing_column_is_schema_error() {
        let csv = "damagedStateAbbreviation,residenceType,tsaEligible\nTX,Apartment,1\n";
        match read_csv(csv.as_bytes()) {
            Err(LoadError::MissingColumn(col)) => assert_eq!(col, COL_REPAIR),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn csv_non_numeric_amount_is_bad_value() {
        let csv = "\
damagedStateAbbreviation,residenceType,tsaEligible,repairAmount
TX,Apartment,1,lots
";
        match read_csv(csv.as_bytes()) {
            Err(LoadError::BadValue { row, column, .. }) => {
                assert_eq!(row, 0);
                assert_eq!(column, COL_REPAIR);
            }
            other => panic!("expected BadValue, got {other:?}"),
        }
    }

    #[test]
    fn csv_accepts_float_formatted_flags() {
        let csv = "\
damagedStateAbbreviation,residenceType,tsaEligible,repairAmount
TX,Apartment,1.0,1000.0
";
        let dataset = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(dataset.applications[0].tsa_eligible, Some(1));
    }

    #[test]
    fn json_happy_path() {
        let json = r#"[
            {"damagedStateAbbreviation": "TX", "residenceType": "Apartment",
             "tsaEligible": 1, "repairAmount": 1000.0},
            {"damagedStateAbbreviation": "FL", "residenceType": "House/Duplex",
             "tsaEligible": 0, "repairAmount": null}
        ]"#;
        let dataset = read_json(json).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(
            dataset.applications[0].label,
            Some(EligibilityLabel::Eligible)
        );
        assert_eq!(dataset.applications[1].repair_amount, None);
    }

    #[test]
    fn json_missing_key_in_one_record_is_null() {
        let json = r#"[
            {"damagedStateAbbreviation": "TX", "residenceType": "Apartment",
             "tsaEligible": 1, "repairAmount": 1000.0},
            {"damagedStateAbbreviation": "FL", "residenceType": "Apartment",
             "tsaEligible": 0}
        ]"#;
        let dataset = read_json(json).unwrap();
        assert_eq!(dataset.applications[1].repair_amount, None);
    }

    #[test]
    fn json_column_absent_everywhere_is_schema_error() {
        let json = r#"[
            {"damagedStateAbbreviation": "TX", "residenceType": "Apartment",
             "tsaEligible": 1}
        ]"#;
        match read_json(json) {
            Err(LoadError::MissingColumn(col)) => assert_eq!(col, COL_REPAIR),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn json_top_level_object_is_malformed() {
        assert!(matches!(
            read_json(r#"{"rows": []}"#),
            Err(LoadError::Malformed(_))
        ));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        match load_file(Path::new("applications.xlsx")) {
            Err(LoadError::UnsupportedExtension(ext)) => assert_eq!(ext, "xlsx"),
            other => panic!("expected UnsupportedExtension, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            load_file(Path::new("no_such_file.csv")),
            Err(LoadError::Io { .. })
        ));
    }

    #[test]
    fn parquet_round_trip() {
        use arrow::array::{Float64Array, Int64Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_STATE, DataType::Utf8, true),
            Field::new(COL_RESIDENCE, DataType::Utf8, true),
            Field::new(COL_TSA, DataType::Int64, true),
            Field::new(COL_REPAIR, DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![Some("TX"), Some("FL"), None])),
                Arc::new(StringArray::from(vec![
                    Some("Apartment"),
                    Some("House/Duplex"),
                    Some("Apartment"),
                ])),
                Arc::new(Int64Array::from(vec![Some(1), Some(0), None])),
                Arc::new(Float64Array::from(vec![Some(1000.0), None, Some(250.0)])),
            ],
        )
        .unwrap();

        let path = std::env::temp_dir().join("relief_dash_loader_round_trip.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let dataset = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.applications[0].state.as_deref(), Some("TX"));
        assert_eq!(
            dataset.applications[1].label,
            Some(EligibilityLabel::NotEligible)
        );
        assert_eq!(dataset.applications[1].repair_amount, None);
        assert_eq!(dataset.applications[2].state, None);
        assert_eq!(dataset.applications[2].label, None);
    }
}
