//! The query builder seam

use crate::criteria::{Criteria, SortOrder};
use crate::error::Result;
use crate::pager::{Pager, last_page};
use async_trait::async_trait;
use serde_json::Value;

/// A query builder a datagrid can filter, sort and paginate
///
/// Filtering and sorting only record constraints; rows are read by the
/// async methods. Field and column names come from the request, so
/// implementations must reject names they do not know with
/// [`QueryError::UnknownFilter`](crate::QueryError::UnknownFilter) and
/// [`QueryError::UnknownSortColumn`](crate::QueryError::UnknownSortColumn).
#[async_trait]
pub trait DatagridQuery: Send + Sync {
	/// Row type produced by the query
	type Row: Send;

	/// Constrain `field` by `value`
	///
	/// Array values mean "any of these".
	fn filter_by(&mut self, field: &str, value: &Value, criteria: Criteria) -> Result<()>;

	/// Append an ordering on `column`; earlier calls take priority
	fn order_by(&mut self, column: &str, order: SortOrder) -> Result<()>;

	/// Drop every ordering added so far
	fn clear_order(&mut self);

	/// Number of rows matching the current filters
	async fn count(&self) -> Result<usize>;

	/// `limit` rows starting at `offset`, in the current order
	async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<Self::Row>>;

	/// Every matching row, in the current order
	async fn fetch_all(&self) -> Result<Vec<Self::Row>>;

	/// Read one page of rows
	///
	/// `page` is clamped into `1..=last_page`. A `max_per_page` of zero
	/// returns every row on a single page.
	async fn paginate(&self, page: usize, max_per_page: usize) -> Result<Pager<Self::Row>> {
		let total = self.count().await?;
		let page = page.clamp(1, last_page(total, max_per_page));

		let results = if max_per_page == 0 {
			self.fetch_all().await?
		} else {
			self.fetch_page((page - 1) * max_per_page, max_per_page).await?
		};

		tracing::trace!(page, max_per_page, total, "paginated datagrid query");
		Ok(Pager::new(results, page, max_per_page, total))
	}
}
