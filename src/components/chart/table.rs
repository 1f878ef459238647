//! Typed query results.
//!
//! The plot endpoint returns rows as JSON objects keyed by column name. They
//! are converted into ordered [`Cell`] vectors so a SQL `NULL` stays distinct
//! from an empty string all the way to rendering.

use serde::Deserialize;
use serde_json::{Map, Value};

/// A single result value.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
	/// SQL `NULL`.
	Null,
	/// Any JSON number.
	Number(f64),
	/// Strings, plus booleans and nested values as JSON text.
	Text(String),
}

impl Cell {
	/// Convert one JSON value.
	pub fn from_json(value: &Value) -> Self {
		match value {
			Value::Null => Cell::Null,
			Value::Number(n) => n.as_f64().map_or(Cell::Null, Cell::Number),
			Value::String(s) => Cell::Text(s.clone()),
			other => Cell::Text(other.to_string()),
		}
	}

	/// Finite numeric value, if any.
	pub fn as_number(&self) -> Option<f64> {
		match self {
			Cell::Number(n) if n.is_finite() => Some(*n),
			_ => None,
		}
	}

	/// `true` only for [`Cell::Null`].
	pub fn is_null(&self) -> bool {
		matches!(self, Cell::Null)
	}

	/// Display text; `NULL` for missing values.
	pub fn display(&self) -> String {
		match self {
			Cell::Null => "NULL".to_string(),
			Cell::Number(n) => n.to_string(),
			Cell::Text(s) => s.clone(),
		}
	}
}

/// Column-ordered result set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultTable {
	/// Column names, in result order.
	pub columns: Vec<String>,
	/// Rows of cells, one per column.
	pub rows: Vec<Vec<Cell>>,
}

/// Indices of the columns used for chart labels and values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChartColumns {
	/// Column holding labels.
	pub label: usize,
	/// Column holding values.
	pub value: usize,
}

impl ResultTable {
	/// Build from JSON row objects. Keys missing from a row become [`Cell::Null`].
	pub fn from_records(columns: Vec<String>, records: &[Map<String, Value>]) -> Self {
		let rows = records
			.iter()
			.map(|record| {
				columns
					.iter()
					.map(|col| record.get(col).map_or(Cell::Null, Cell::from_json))
					.collect()
			})
			.collect();
		Self { columns, rows }
	}

	/// Position of column `name`.
	pub fn column_index(&self, name: &str) -> Option<usize> {
		self.columns.iter().position(|c| c == name)
	}

	/// Pick chart columns from the first row.
	///
	/// Labels come from the first non-numeric column (falling back to the first
	/// column); values from the first numeric column. Without a numeric column
	/// there is nothing to chart.
	pub fn infer_chart_columns(&self) -> Option<ChartColumns> {
		let first = self.rows.first()?;
		let value = first.iter().position(|c| c.as_number().is_some())?;
		let label = first.iter().position(|c| c.as_number().is_none()).unwrap_or(0);
		Some(ChartColumns { label, value })
	}
}

/// Response of the plot endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct PlotResult {
	/// Column names, in result order.
	#[serde(default)]
	pub columns: Vec<String>,
	/// Rows keyed by column name.
	#[serde(default)]
	pub rows: Vec<Map<String, Value>>,
	/// Requested chart kind; see `ChartKind`.
	#[serde(default = "default_chart_type")]
	pub chart_type: String,
	/// Label column chosen by the backend.
	#[serde(default)]
	pub label_col: Option<String>,
	/// Value column chosen by the backend.
	#[serde(default)]
	pub value_col: Option<String>,
	/// Rows returned.
	#[serde(default)]
	pub row_count: usize,
	/// Rows the query produced before truncation.
	#[serde(default)]
	pub total_rows: usize,
	/// Query run time.
	#[serde(default)]
	pub duration_ms: u64,
	/// `true` when `rows` is a prefix of the full result.
	#[serde(default)]
	pub truncated: bool,
}

fn default_chart_type() -> String {
	"bar".to_string()
}

impl PlotResult {
	/// Rows as typed cells.
	pub fn table(&self) -> ResultTable {
		ResultTable::from_records(self.columns.clone(), &self.rows)
	}

	/// Chart columns named by the backend, or inferred when it named none.
	pub fn chart_columns(&self, table: &ResultTable) -> Option<ChartColumns> {
		let named = self
			.label_col
			.as_deref()
			.and_then(|l| table.column_index(l))
			.zip(self.value_col.as_deref().and_then(|v| table.column_index(v)));
		match named {
			Some((label, value)) => Some(ChartColumns { label, value }),
			None => table.infer_chart_columns(),
		}
	}
}
