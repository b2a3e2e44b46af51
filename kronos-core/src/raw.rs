//! Raw, untyped tables as they arrive from ingestion layers.

use chrono::{DateTime, Utc};
use kronos_types::KronosError;

use crate::table::ValidatedTable;

/// A single untyped cell.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Missing cell.
    Null,
    /// Integer cell.
    Int(i64),
    /// Floating point cell.
    Float(f64),
    /// Text cell.
    Text(String),
    /// Already-typed timestamp cell.
    Timestamp(DateTime<Utc>),
}

impl RawValue {
    /// Coerce to a finite float.
    ///
    /// Text is trimmed and parsed; anything non-coercible, `NaN` or infinite
    /// becomes `None`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_f64(&self) -> Option<f64> {
        let v = match self {
            Self::Null | Self::Timestamp(_) => return None,
            Self::Int(i) => *i as f64,
            Self::Float(f) => *f,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }

    /// Returns true for [`RawValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<DateTime<Utc>> for RawValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for RawValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// A named column of raw cells.
#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    name: String,
    values: Vec<RawValue>,
}

impl RawColumn {
    /// Column name as supplied by the source.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cells in row order.
    #[must_use]
    pub fn values(&self) -> &[RawValue] {
        &self.values
    }
}

/// Column-oriented table with an arbitrary column set.
///
/// Every ingestion path (delimited text, Parquet, Feather/IPC, in-memory
/// records) converges on this shape before normalization. All columns have
/// the same length and names are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<RawColumn>,
    rows: usize,
}

impl RawTable {
    /// Empty table with no columns and no rows.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            columns: Vec::new(),
            rows: 0,
        }
    }

    /// Append a column.
    ///
    /// # Errors
    /// Returns `Schema` if the name is already present or the length differs
    /// from existing columns.
    pub fn with_column<V>(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self, KronosError>
    where
        V: Into<RawValue>,
    {
        self.push_column(name.into(), values.into_iter().map(Into::into).collect())?;
        Ok(self)
    }

    /// Build a table from row records.
    ///
    /// Column order follows first appearance across rows; cells absent from a
    /// record are `Null`.
    ///
    /// # Errors
    /// Returns `Schema` if a record repeats a column name.
    pub fn from_rows<I, R>(records: I) -> Result<Self, KronosError>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (String, RawValue)>,
    {
        let mut table = Self::new();
        for record in records {
            let row_index = table.rows;
            for (name, value) in record {
                let idx = match table.position(&name) {
                    Some(i) => i,
                    None => {
                        table.columns.push(RawColumn {
                            name,
                            values: vec![RawValue::Null; row_index],
                        });
                        table.columns.len() - 1
                    }
                };
                let col = &mut table.columns[idx];
                if col.values.len() > row_index {
                    return Err(KronosError::Schema(format!(
                        "duplicate column {:?} in record {row_index}",
                        col.name
                    )));
                }
                col.values.push(value);
            }
            table.rows += 1;
            for col in &mut table.columns {
                col.values.resize(table.rows, RawValue::Null);
            }
        }
        Ok(table)
    }

    fn push_column(&mut self, name: String, values: Vec<RawValue>) -> Result<(), KronosError> {
        if self.position(&name).is_some() {
            return Err(KronosError::Schema(format!("duplicate column {name:?}")));
        }
        if !self.columns.is_empty() && values.len() != self.rows {
            return Err(KronosError::Schema(format!(
                "column {name:?} has {} rows, expected {}",
                values.len(),
                self.rows
            )));
        }
        self.rows = values.len();
        self.columns.push(RawColumn { name, values });
        Ok(())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Number of rows.
    #[must_use]
    pub const fn row_count(&self) -> usize {
        self.rows
    }

    /// Returns true if the named column exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Cells of the named column.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[RawValue]> {
        self.position(name).map(|i| self.columns[i].values.as_slice())
    }

    /// Column names in source order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// All columns in source order.
    #[must_use]
    pub fn columns(&self) -> &[RawColumn] {
        &self.columns
    }

    /// Rename a column in place.
    ///
    /// Renaming onto an existing name replaces that column. Missing sources are
    /// ignored.
    pub fn rename(&mut self, from: &str, to: &str) {
        if from == to || !self.has_column(from) {
            return;
        }
        if let Some(dst) = self.position(to) {
            self.columns.remove(dst);
        }
        if let Some(src) = self.position(from) {
            self.columns[src].name = to.to_string();
        }
    }
}

impl From<&ValidatedTable> for RawTable {
    fn from(t: &ValidatedTable) -> Self {
        let floats = |v: &[f64]| v.iter().copied().map(RawValue::Float).collect::<Vec<_>>();
        let columns = vec![
            RawColumn {
                name: "timestamps".into(),
                values: t.timestamps().iter().copied().map(RawValue::Timestamp).collect(),
            },
            RawColumn { name: "open".into(), values: floats(t.open()) },
            RawColumn { name: "high".into(), values: floats(t.high()) },
            RawColumn { name: "low".into(), values: floats(t.low()) },
            RawColumn { name: "close".into(), values: floats(t.close()) },
            RawColumn { name: "volume".into(), values: floats(t.volume()) },
            RawColumn { name: "amount".into(), values: floats(t.amount()) },
        ];
        Self {
            columns,
            rows: t.len(),
        }
    }
}

/// Boundary-supplied hints applied before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnHints {
    renames: Vec<(String, String)>,
    timestamp_column: Option<String>,
}

impl ColumnHints {
    /// No renames and default timestamp resolution.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            renames: Vec::new(),
            timestamp_column: None,
        }
    }

    /// Map a source column name onto a canonical one (e.g. `"Close"` → `"close"`).
    #[must_use]
    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.renames.push((from.into(), to.into()));
        self
    }

    /// Read timestamps from this column ahead of the default resolution order.
    #[must_use]
    pub fn timestamp_column(mut self, name: impl Into<String>) -> Self {
        self.timestamp_column = Some(name.into());
        self
    }

    /// Configured renames in application order.
    #[must_use]
    pub fn renames(&self) -> &[(String, String)] {
        &self.renames
    }

    /// Explicit timestamp column, if any.
    #[must_use]
    pub fn timestamp_source(&self) -> Option<&str> {
        self.timestamp_column.as_deref()
    }
}
