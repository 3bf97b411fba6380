//! Datagrid exports
//!
//! An export receives the datagrid's query once filters and sort have been
//! applied, and turns every matching row into a downloadable document.

use crate::error::Result;
use async_trait::async_trait;
use datagrid_query::DatagridQuery;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

#[cfg(feature = "export")]
use crate::definition::Columns;
#[cfg(feature = "export")]
use crate::error::DatagridError;

/// Exports declared by a datagrid, by name
pub type Exports<Q> = IndexMap<String, Box<dyn Export<Q>>>;

/// A rendered export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportOutput {
	/// MIME type of `body`
	pub content_type: String,
	/// Suggested download name
	pub filename: String,
	/// Document bytes
	pub body: Vec<u8>,
}

/// Turns the rows of a query into a document
#[async_trait]
pub trait Export<Q: DatagridQuery>: Send + Sync {
	/// Render every row of `query`; `params` come from the caller
	async fn execute(&self, query: &Q, params: &Map<String, Value>) -> Result<ExportOutput>;
}

#[cfg(feature = "export")]
fn filename_param(params: &Map<String, Value>, default: &str) -> String {
	params
		.get("filename")
		.and_then(Value::as_str)
		.filter(|name| !name.is_empty())
		.unwrap_or(default)
		.to_string()
}

#[cfg(feature = "export")]
fn cell(value: Option<&Value>) -> String {
	match value {
		None | Some(Value::Null) => String::new(),
		Some(Value::String(s)) => s.clone(),
		Some(other) => other.to_string(),
	}
}

/// CSV export of selected columns
///
/// Rows are serialized to JSON objects and projected on the column names;
/// the header row holds the column labels.
#[cfg(feature = "export")]
#[derive(Debug, Clone)]
pub struct CsvExport {
	columns: Columns,
	filename: String,
	delimiter: u8,
}

#[cfg(feature = "export")]
impl CsvExport {
	/// Export `columns`, keyed by field, valued by header label
	pub fn new(columns: Columns) -> Self {
		Self {
			columns,
			filename: "export.csv".to_string(),
			delimiter: b',',
		}
	}

	/// Default download name; a `filename` param overrides it
	pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
		self.filename = filename.into();
		self
	}

	/// Field delimiter
	pub fn with_delimiter(mut self, delimiter: u8) -> Self {
		self.delimiter = delimiter;
		self
	}
}

#[cfg(feature = "export")]
#[async_trait]
impl<Q> Export<Q> for CsvExport
where
	Q: DatagridQuery,
	Q::Row: Serialize,
{
	async fn execute(&self, query: &Q, params: &Map<String, Value>) -> Result<ExportOutput> {
		let rows = query.fetch_all().await?;

		let mut writer = csv::WriterBuilder::new()
			.delimiter(self.delimiter)
			.from_writer(Vec::new());
		writer.write_record(self.columns.values())?;
		for row in &rows {
			let value = serde_json::to_value(row)?;
			writer.write_record(self.columns.keys().map(|column| cell(value.get(column))))?;
		}
		let body = writer
			.into_inner()
			.map_err(|e| DatagridError::Export(e.to_string()))?;

		tracing::debug!(rows = rows.len(), "rendered csv export");
		Ok(ExportOutput {
			content_type: "text/csv".to_string(),
			filename: filename_param(params, &self.filename),
			body,
		})
	}
}

/// JSON array export of whole rows
#[cfg(feature = "export")]
#[derive(Debug, Clone)]
pub struct JsonExport {
	filename: String,
	pretty: bool,
}

#[cfg(feature = "export")]
impl Default for JsonExport {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(feature = "export")]
impl JsonExport {
	/// Compact JSON export
	pub fn new() -> Self {
		Self {
			filename: "export.json".to_string(),
			pretty: false,
		}
	}

	/// Default download name; a `filename` param overrides it
	pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
		self.filename = filename.into();
		self
	}

	/// Indent the output
	pub fn pretty(mut self) -> Self {
		self.pretty = true;
		self
	}
}

#[cfg(feature = "export")]
#[async_trait]
impl<Q> Export<Q> for JsonExport
where
	Q: DatagridQuery,
	Q::Row: Serialize,
{
	async fn execute(&self, query: &Q, params: &Map<String, Value>) -> Result<ExportOutput> {
		let rows = query.fetch_all().await?;
		let body = if self.pretty {
			serde_json::to_vec_pretty(&rows)?
		} else {
			serde_json::to_vec(&rows)?
		};

		tracing::debug!(rows = rows.len(), "rendered json export");
		Ok(ExportOutput {
			content_type: "application/json".to_string(),
			filename: filename_param(params, &self.filename),
			body,
		})
	}
}

#[cfg(all(test, feature = "export"))]
mod tests {
	use super::*;
	use datagrid_query::{DatagridQuery, MemoryQuery, SortOrder};
	use rstest::*;
	use serde_json::json;

	#[derive(Debug, Clone, Serialize)]
	struct City {
		name: &'static str,
		population: Option<u32>,
	}

	#[fixture]
	fn query() -> MemoryQuery<City> {
		let mut query = MemoryQuery::new(vec![
			City { name: "Lyon", population: Some(522_000) },
			City { name: "Aix, en Provence", population: None },
		])
		.with_field("name", |c: &City| json!(c.name));
		query.order_by("name", SortOrder::Asc).unwrap();
		query
	}

	#[rstest]
	#[tokio::test]
	async fn test_csv_export_projects_columns(query: MemoryQuery<City>) {
		let mut columns = Columns::new();
		columns.insert("name".to_string(), "City".to_string());
		columns.insert("population".to_string(), "Population".to_string());

		let output = CsvExport::new(columns).execute(&query, &Map::new()).await.unwrap();

		assert_eq!(output.content_type, "text/csv");
		assert_eq!(output.filename, "export.csv");
		assert_eq!(
			String::from_utf8(output.body).unwrap(),
			"City,Population\n\"Aix, en Provence\",\nLyon,522000\n"
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_json_export_honours_filename_param(query: MemoryQuery<City>) {
		let mut params = Map::new();
		params.insert("filename".to_string(), json!("cities.json"));

		let output = JsonExport::new().execute(&query, &params).await.unwrap();

		assert_eq!(output.filename, "cities.json");
		let body: Value = serde_json::from_slice(&output.body).unwrap();
		assert_eq!(body[0]["name"], json!("Aix, en Provence"));
		assert_eq!(body[1]["population"], json!(522000));
	}
}
