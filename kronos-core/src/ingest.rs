//! Data-file discovery and (with the `dataframe` feature) tabular file reading.

use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use kronos_types::KronosError;
use serde::{Deserialize, Serialize};

/// On-disk tabular formats understood by the ingestion layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableFormat {
    /// Comma-separated text with a header row.
    Csv,
    /// Apache Parquet.
    Parquet,
    /// Arrow IPC / Feather v2.
    Feather,
}

impl TableFormat {
    /// Resolve a format from a file extension (with or without leading dot).
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "parquet" => Some(Self::Parquet),
            "feather" | "arrow" | "ipc" => Some(Self::Feather),
            _ => None,
        }
    }

    /// Resolve a format from a path's extension.
    ///
    /// # Errors
    /// Returns `InvalidArg` for a missing or unsupported extension.
    pub fn from_path(path: &Path) -> Result<Self, KronosError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        Self::from_extension(ext).ok_or_else(|| {
            KronosError::InvalidArg(format!("unsupported file format: {:?}", path.display().to_string()))
        })
    }
}

/// A candidate input file found in the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFile {
    /// File name without directory.
    pub name: String,
    /// Full path.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time, when the platform reports one.
    pub modified: Option<DateTime<Utc>>,
}

/// List files in `dir` whose extension is in `allowed`, newest first.
///
/// A missing directory yields an empty list.
///
/// # Errors
/// Returns `Io` when the directory exists but cannot be read.
pub fn list_data_files(dir: &Path, allowed: &[String]) -> Result<Vec<DataFile>, KronosError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let meta = entry.metadata()?;
        if !meta.is_file() {
            continue;
        }
        let path = entry.path();
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !allowed
            .iter()
            .any(|a| a.trim_start_matches('.').eq_ignore_ascii_case(ext))
        {
            continue;
        }
        files.push(DataFile {
            name: entry.file_name().to_string_lossy().into_owned(),
            path,
            size: meta.len(),
            modified: meta.modified().ok().map(DateTime::<Utc>::from),
        });
    }
    files.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.name.cmp(&b.name)));
    Ok(files)
}

#[cfg(feature = "dataframe")]
pub use self::frame::{raw_table_from_frame, read_table};

#[cfg(feature = "dataframe")]
mod frame {
    use std::fs::File;
    use std::path::Path;

    use chrono::{DateTime, Utc};
    use kronos_types::KronosError;
    use polars::prelude::*;

    use super::TableFormat;
    use crate::raw::{RawTable, RawValue};

    fn polars_err(path: &Path) -> impl Fn(PolarsError) -> KronosError + '_ {
        move |e| KronosError::Io(format!("failed to read {}: {e}", path.display()))
    }

    /// Read a CSV, Parquet or Feather file into a [`RawTable`].
    ///
    /// # Errors
    /// - `InvalidArg` for an unsupported extension.
    /// - `Io` when the file is missing or cannot be decoded.
    pub fn read_table(path: &Path) -> Result<RawTable, KronosError> {
        let format = TableFormat::from_path(path)?;
        let on_err = polars_err(path);
        let df = match format {
            TableFormat::Csv => CsvReadOptions::default()
                .with_has_header(true)
                .try_into_reader_with_file_path(Some(path.to_path_buf()))
                .map_err(&on_err)?
                .finish()
                .map_err(&on_err)?,
            TableFormat::Parquet => ParquetReader::new(File::open(path)?)
                .finish()
                .map_err(&on_err)?,
            TableFormat::Feather => IpcReader::new(File::open(path)?)
                .finish()
                .map_err(&on_err)?,
        };
        raw_table_from_frame(&df)
    }

    /// Convert a polars frame into a [`RawTable`], preserving column order.
    ///
    /// # Errors
    /// Returns `Schema` when a column cannot be converted.
    pub fn raw_table_from_frame(df: &DataFrame) -> Result<RawTable, KronosError> {
        let mut table = RawTable::new();
        for column in df.get_columns() {
            let series = column.as_materialized_series();
            let values = series_values(series)
                .map_err(|e| KronosError::Schema(format!("column {}: {e}", series.name())))?;
            table = table.with_column(series.name().as_str(), values)?;
        }
        Ok(table)
    }

    fn series_values(s: &Series) -> PolarsResult<Vec<RawValue>> {
        let dtype = s.dtype().clone();
        let values: Vec<RawValue> = match dtype {
            DataType::String => s
                .str()?
                .into_iter()
                .map(|v| v.map_or(RawValue::Null, RawValue::from))
                .collect(),
            DataType::Datetime(unit, _) => {
                let to_utc: fn(i64) -> Option<DateTime<Utc>> = match unit {
                    TimeUnit::Nanoseconds => |v: i64| Some(DateTime::from_timestamp_nanos(v)),
                    TimeUnit::Microseconds => DateTime::from_timestamp_micros,
                    TimeUnit::Milliseconds => DateTime::from_timestamp_millis,
                };
                s.cast(&DataType::Int64)?
                    .i64()?
                    .into_iter()
                    .map(|v| v.and_then(to_utc).into())
                    .collect()
            }
            DataType::Date => s
                .cast(&DataType::Int32)?
                .i32()?
                .into_iter()
                .map(|v| {
                    v.and_then(|days| DateTime::from_timestamp(i64::from(days) * 86_400, 0))
                        .into()
                })
                .collect(),
            dt if dt.is_integer() => s
                .cast(&DataType::Int64)?
                .i64()?
                .into_iter()
                .map(RawValue::from)
                .collect(),
            dt if dt.is_float() => s
                .cast(&DataType::Float64)?
                .f64()?
                .into_iter()
                .map(RawValue::from)
                .collect(),
            _ => s
                .cast(&DataType::String)?
                .str()?
                .into_iter()
                .map(|v| v.map_or(RawValue::Null, RawValue::from))
                .collect(),
        };
        Ok(values)
    }
}
