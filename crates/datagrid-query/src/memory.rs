//! In-memory query over a `Vec` of rows

use crate::criteria::{Criteria, SortOrder, compare_values};
use crate::error::{QueryError, Result};
use crate::query::DatagridQuery;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

type Predicate<R> = Arc<dyn Fn(&R, &Value, Criteria) -> bool + Send + Sync>;
type Comparator<R> = Arc<dyn Fn(&R, &R) -> Ordering + Send + Sync>;

/// A [`DatagridQuery`] over rows held in memory
///
/// Every filterable field needs a predicate and every sortable column a
/// comparator. [`with_field`](Self::with_field) registers both from a
/// single accessor that projects the row to a JSON value.
pub struct MemoryQuery<R> {
	rows: Vec<R>,
	predicates: IndexMap<String, Predicate<R>>,
	comparators: IndexMap<String, Comparator<R>>,
	filters: Vec<(String, Value, Criteria)>,
	order: Vec<(String, SortOrder)>,
}

impl<R> Clone for MemoryQuery<R>
where
	R: Clone,
{
	fn clone(&self) -> Self {
		Self {
			rows: self.rows.clone(),
			predicates: self.predicates.clone(),
			comparators: self.comparators.clone(),
			filters: self.filters.clone(),
			order: self.order.clone(),
		}
	}
}

impl<R> fmt::Debug for MemoryQuery<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MemoryQuery")
			.field("rows", &self.rows.len())
			.field("fields", &self.predicates.keys().collect::<Vec<_>>())
			.field("columns", &self.comparators.keys().collect::<Vec<_>>())
			.field("filters", &self.filters)
			.field("order", &self.order)
			.finish()
	}
}

impl<R> MemoryQuery<R>
where
	R: Clone + Send + Sync + 'static,
{
	/// Create a query over `rows` with no filterable or sortable fields
	pub fn new(rows: Vec<R>) -> Self {
		Self {
			rows,
			predicates: IndexMap::new(),
			comparators: IndexMap::new(),
			filters: Vec::new(),
			order: Vec::new(),
		}
	}

	/// Make `name` filterable and sortable through a value accessor
	pub fn with_field<F>(self, name: impl Into<String>, accessor: F) -> Self
	where
		F: Fn(&R) -> Value + Send + Sync + 'static,
	{
		let name = name.into();
		let accessor = Arc::new(accessor);
		let sort_accessor = Arc::clone(&accessor);

		self.with_filter(name.clone(), move |row, value, criteria| {
			criteria.matches(&accessor(row), value)
		})
		.with_sort(name, move |a, b| compare_values(&sort_accessor(a), &sort_accessor(b)))
	}

	/// Register a custom filter predicate for `name`
	pub fn with_filter<F>(mut self, name: impl Into<String>, predicate: F) -> Self
	where
		F: Fn(&R, &Value, Criteria) -> bool + Send + Sync + 'static,
	{
		self.predicates.insert(name.into(), Arc::new(predicate));
		self
	}

	/// Register a custom ascending comparator for `name`
	pub fn with_sort<F>(mut self, name: impl Into<String>, comparator: F) -> Self
	where
		F: Fn(&R, &R) -> Ordering + Send + Sync + 'static,
	{
		self.comparators.insert(name.into(), Arc::new(comparator));
		self
	}

	/// Append a row
	pub fn push(&mut self, row: R) {
		self.rows.push(row);
	}

	/// Filters recorded so far
	pub fn filters(&self) -> &[(String, Value, Criteria)] {
		&self.filters
	}

	/// Orderings recorded so far, highest priority first
	pub fn ordering(&self) -> &[(String, SortOrder)] {
		&self.order
	}

	fn matching_rows(&self) -> Vec<&R> {
		let mut rows: Vec<&R> = self
			.rows
			.iter()
			.filter(|row| {
				self.filters.iter().all(|(field, value, criteria)| {
					self.predicates
						.get(field)
						.is_some_and(|predicate| predicate(row, value, *criteria))
				})
			})
			.collect();

		if !self.order.is_empty() {
			rows.sort_by(|a, b| {
				self.order
					.iter()
					.filter_map(|(column, order)| {
						self.comparators
							.get(column)
							.map(|compare| order.apply(compare(a, b)))
					})
					.find(|ordering| ordering.is_ne())
					.unwrap_or(Ordering::Equal)
			});
		}

		rows
	}
}

#[async_trait]
impl<R> DatagridQuery for MemoryQuery<R>
where
	R: Clone + Send + Sync + 'static,
{
	type Row = R;

	fn filter_by(&mut self, field: &str, value: &Value, criteria: Criteria) -> Result<()> {
		if !self.predicates.contains_key(field) {
			return Err(QueryError::UnknownFilter(field.to_string()));
		}
		tracing::trace!(field, %value, %criteria, "filter memory query");
		self.filters.push((field.to_string(), value.clone(), criteria));
		Ok(())
	}

	fn order_by(&mut self, column: &str, order: SortOrder) -> Result<()> {
		if !self.comparators.contains_key(column) {
			return Err(QueryError::UnknownSortColumn(column.to_string()));
		}
		tracing::trace!(column, %order, "order memory query");
		self.order.push((column.to_string(), order));
		Ok(())
	}

	fn clear_order(&mut self) {
		self.order.clear();
	}

	async fn count(&self) -> Result<usize> {
		Ok(self.matching_rows().len())
	}

	async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<R>> {
		Ok(self
			.matching_rows()
			.into_iter()
			.skip(offset)
			.take(limit)
			.cloned()
			.collect())
	}

	async fn fetch_all(&self) -> Result<Vec<R>> {
		Ok(self.matching_rows().into_iter().cloned().collect())
	}
}
