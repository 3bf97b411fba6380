//! SQLite-backed datagrid query
//!
//! Filter fields and sort columns are allow-listed: request-supplied names
//! are only ever mapped to SQL expressions registered by the application,
//! and every value is bound as a parameter.

use crate::criteria::{Criteria, SortOrder};
use crate::error::{QueryError, Result};
use crate::query::DatagridQuery;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use sqlx::sqlite::{Sqlite, SqlitePool, SqliteRow};
use sqlx::{FromRow, QueryBuilder};
use std::marker::PhantomData;

/// A [`DatagridQuery`] that renders `SELECT` statements for SQLite
///
/// # Examples
///
/// ```no_run
/// use datagrid_query::{Criteria, SortOrder, SqliteQuery};
/// use serde_json::json;
/// use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool) -> datagrid_query::Result<()> {
/// let mut query = SqliteQuery::<(i64, String)>::new(pool, "users")
///     .select(["id", "name"])
///     .filter_column("name", "name")
///     .sort_column("name", "name");
///
/// use datagrid_query::DatagridQuery;
/// query.filter_by("name", &json!("%bo%"), Criteria::Like)?;
/// query.order_by("name", SortOrder::Desc)?;
///
/// assert_eq!(
///     query.to_sql(),
///     "SELECT id, name FROM users WHERE name LIKE ? ORDER BY name DESC"
/// );
/// # Ok(())
/// # }
/// ```
pub struct SqliteQuery<R> {
	pool: SqlitePool,
	table: String,
	select: Vec<String>,
	filter_columns: IndexMap<String, String>,
	sort_columns: IndexMap<String, String>,
	filters: Vec<(String, Value, Criteria)>,
	order: Vec<(String, SortOrder)>,
	_row: PhantomData<fn() -> R>,
}

impl<R> std::fmt::Debug for SqliteQuery<R> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SqliteQuery")
			.field("table", &self.table)
			.field("select", &self.select)
			.field("filters", &self.filters)
			.field("order", &self.order)
			.finish_non_exhaustive()
	}
}

impl<R> SqliteQuery<R> {
	/// Query every column of `table`
	pub fn new(pool: SqlitePool, table: impl Into<String>) -> Self {
		Self {
			pool,
			table: table.into(),
			select: Vec::new(),
			filter_columns: IndexMap::new(),
			sort_columns: IndexMap::new(),
			filters: Vec::new(),
			order: Vec::new(),
			_row: PhantomData,
		}
	}

	/// Restrict the selected columns
	pub fn select<I, S>(mut self, columns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.select = columns.into_iter().map(Into::into).collect();
		self
	}

	/// Allow filtering on `name`, mapped to the SQL expression `column`
	pub fn filter_column(mut self, name: impl Into<String>, column: impl Into<String>) -> Self {
		self.filter_columns.insert(name.into(), column.into());
		self
	}

	/// Allow sorting on `name`, mapped to the SQL expression `column`
	pub fn sort_column(mut self, name: impl Into<String>, column: impl Into<String>) -> Self {
		self.sort_columns.insert(name.into(), column.into());
		self
	}

	/// Allow both filtering and sorting on a column of the same name
	pub fn column(self, name: &str) -> Self {
		self.filter_column(name, name).sort_column(name, name)
	}

	/// The pool rows are read from
	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	/// The `SELECT` statement without pagination, placeholders included
	pub fn to_sql(&self) -> String {
		let mut builder = self.select_builder(false);
		self.push_order(&mut builder);
		builder.sql().to_string()
	}

	fn select_builder(&self, count: bool) -> QueryBuilder<'static, Sqlite> {
		let projection = if count {
			"COUNT(*)".to_string()
		} else if self.select.is_empty() {
			"*".to_string()
		} else {
			self.select.join(", ")
		};

		let mut builder = QueryBuilder::new(format!("SELECT {} FROM {}", projection, self.table));
		for (index, (column, value, criteria)) in self.filters.iter().enumerate() {
			builder.push(if index == 0 { " WHERE " } else { " AND " });
			push_condition(&mut builder, column, value, *criteria);
		}
		builder
	}

	fn push_order(&self, builder: &mut QueryBuilder<'static, Sqlite>) {
		for (index, (column, order)) in self.order.iter().enumerate() {
			builder.push(if index == 0 { " ORDER BY " } else { ", " });
			builder.push(column).push(" ").push(order.as_sql());
		}
	}
}

fn push_condition(builder: &mut QueryBuilder<'static, Sqlite>, column: &str, value: &Value, criteria: Criteria) {
	match value {
		Value::Array(items) if items.is_empty() => {
			builder.push("0 = 1");
		}
		Value::Array(items) if criteria == Criteria::Equal => {
			builder.push(column).push(" IN (");
			let mut separated = builder.separated(", ");
			for item in items {
				push_scalar(&mut separated, item);
			}
			separated.push_unseparated(")");
		}
		Value::Array(items) => {
			builder.push("(");
			for (index, item) in items.iter().enumerate() {
				if index > 0 {
					builder.push(" OR ");
				}
				push_condition(builder, column, item, criteria);
			}
			builder.push(")");
		}
		Value::Null => {
			builder.push(column).push(" IS NULL");
		}
		scalar => {
			builder.push(column).push(" ").push(criteria.as_sql()).push(" ");
			bind_scalar(builder, scalar);
		}
	}
}

fn bind_scalar(builder: &mut QueryBuilder<'static, Sqlite>, value: &Value) {
	match value {
		Value::Bool(flag) => builder.push_bind(*flag),
		Value::Number(n) => match n.as_i64() {
			Some(i) => builder.push_bind(i),
			None => builder.push_bind(n.as_f64().unwrap_or_default()),
		},
		Value::String(s) => builder.push_bind(s.clone()),
		other => builder.push_bind(other.to_string()),
	};
}

fn push_scalar(separated: &mut sqlx::query_builder::Separated<'_, 'static, Sqlite, &str>, value: &Value) {
	match value {
		Value::Bool(flag) => separated.push_bind(*flag),
		Value::Number(n) => match n.as_i64() {
			Some(i) => separated.push_bind(i),
			None => separated.push_bind(n.as_f64().unwrap_or_default()),
		},
		Value::String(s) => separated.push_bind(s.clone()),
		other => separated.push_bind(other.to_string()),
	};
}

#[async_trait]
impl<R> DatagridQuery for SqliteQuery<R>
where
	R: for<'r> FromRow<'r, SqliteRow> + Send + Unpin + 'static,
{
	type Row = R;

	fn filter_by(&mut self, field: &str, value: &Value, criteria: Criteria) -> Result<()> {
		let column = self
			.filter_columns
			.get(field)
			.ok_or_else(|| QueryError::UnknownFilter(field.to_string()))?;
		if value.is_object() {
			return Err(QueryError::UnsupportedValue {
				field: field.to_string(),
				value: value.to_string(),
			});
		}
		tracing::trace!(field, column = %column, %criteria, "filter sqlite query");
		self.filters.push((column.clone(), value.clone(), criteria));
		Ok(())
	}

	fn order_by(&mut self, column: &str, order: SortOrder) -> Result<()> {
		let expression = self
			.sort_columns
			.get(column)
			.ok_or_else(|| QueryError::UnknownSortColumn(column.to_string()))?;
		tracing::trace!(column, expression = %expression, %order, "order sqlite query");
		self.order.push((expression.clone(), order));
		Ok(())
	}

	fn clear_order(&mut self) {
		self.order.clear();
	}

	async fn count(&self) -> Result<usize> {
		let mut builder = self.select_builder(true);
		let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
		Ok(usize::try_from(count).unwrap_or_default())
	}

	async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<R>> {
		let mut builder = self.select_builder(false);
		self.push_order(&mut builder);
		builder
			.push(" LIMIT ")
			.push_bind(i64::try_from(limit).unwrap_or(i64::MAX))
			.push(" OFFSET ")
			.push_bind(i64::try_from(offset).unwrap_or(i64::MAX));

		tracing::trace!(sql = builder.sql(), "fetch sqlite page");
		let rows = builder.build_query_as::<R>().fetch_all(&self.pool).await?;
		Ok(rows)
	}

	async fn fetch_all(&self) -> Result<Vec<R>> {
		let mut builder = self.select_builder(false);
		self.push_order(&mut builder);

		tracing::trace!(sql = builder.sql(), "fetch sqlite rows");
		let rows = builder.build_query_as::<R>().fetch_all(&self.pool).await?;
		Ok(rows)
	}
}
