//! The datagrid driver

use crate::context::DatagridContext;
use crate::definition::{Columns, DatagridDefinition, SortState};
use crate::error::{DatagridError, Result};
use crate::export::ExportOutput;
use crate::params::ParameterNames;
use datagrid_forms::{FilterForm, FilterFormView, FilterKind};
use datagrid_http::RouteParams;
use datagrid_query::{Criteria, DatagridQuery, Pager, SortOrder};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

type Row<D> = <<D as DatagridDefinition>::Query as DatagridQuery>::Row;

/// A datagrid bound to one request
///
/// Reads the request and the session to decide which filters, sort order,
/// columns and page apply, pushes them into the query, then keeps the
/// resulting [`Pager`].
pub struct Datagrid<D: DatagridDefinition> {
	definition: D,
	context: DatagridContext,
	options: Map<String, Value>,
	query: D::Query,
	filter: Option<FilterForm>,
	results: Option<Pager<Row<D>>>,
	max_per_page: Option<usize>,
	params: ParameterNames,
	session_name: String,
}

impl<D: DatagridDefinition> std::fmt::Debug for Datagrid<D> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Datagrid")
			.field("name", &self.definition.name())
			.field("options", &self.options)
			.field("filter", &self.filter)
			.field("max_per_page", &self.max_per_page)
			.finish_non_exhaustive()
	}
}

impl<D: DatagridDefinition> Datagrid<D> {
	/// Bind `definition` to a request
	///
	/// Builds the query from `options` and, when the definition declares
	/// filter fields, the filter form.
	pub fn new(definition: D, context: DatagridContext, options: Map<String, Value>) -> Self {
		let query = definition.configure_query(&options);
		let params = definition.parameter_names(context.settings());
		let session_name = format!("{}.{}", context.settings().session_prefix, definition.name());

		let fields = definition.configure_filter();
		let filter = (!fields.is_empty()).then(|| {
			let mut form = FilterForm::new(definition.filter_form_name());
			for field in fields {
				form.add(field);
			}
			definition.configure_filter_form(&mut form);
			form
		});

		Self {
			definition,
			context,
			options,
			query,
			filter,
			results: None,
			max_per_page: None,
			params,
			session_name,
		}
	}

	/// Bind `definition` to a request with no options
	pub fn create(definition: D, context: DatagridContext) -> Self {
		Self::new(definition, context, Map::new())
	}

	/// Apply filters, columns, sort and page, then read the current page
	pub async fn execute(&mut self) -> Result<&mut Self> {
		self.definition.pre_execute(&self.context, &mut self.query)?;

		if self.is_action(&self.params.reset) {
			self.reset();
		}
		self.filter()?;
		self.manage_columns();
		self.sort()?;

		let page = self.current_page(1);
		let pager = self.query.paginate(page, self.max_per_page()).await?;
		tracing::debug!(
			datagrid = %self.name(),
			page = pager.page(),
			total = pager.total(),
			"executed datagrid"
		);
		self.results = Some(pager);

		self.definition.post_execute(&self.context, &mut self.query)?;
		Ok(self)
	}

	/// Forget stored filters and sort when the request targets this datagrid
	pub fn reset(&mut self) -> &mut Self {
		if self.targets_self() {
			tracing::debug!(datagrid = %self.name(), "reset datagrid");
			self.reset_filters().reset_sort();
		}
		self
	}

	// Filtering

	fn filter(&mut self) -> Result<()> {
		let Some(form) = self.filter.as_mut() else {
			return Ok(());
		};

		let request = self.context.request();
		let session = self.context.session();
		let filter_key = format!("{}.filter", self.session_name);
		let method_allowed = request.method_in(&self.definition.allowed_filter_methods(self.context.settings()));

		let submitted = if method_allowed {
			request.get_group(form.name()).filter(|data| !data.is_empty())
		} else {
			None
		};
		let data = match submitted {
			Some(data) => data,
			None => match session.get(&filter_key) {
				Some(Value::Object(stored)) => stored,
				_ => self.definition.default_filters(),
			},
		};

		form.submit(data.clone());
		if !form.is_valid() {
			tracing::warn!(datagrid = %self.definition.name(), errors = ?form.errors(), "invalid filter data");
			return Ok(());
		}

		if method_allowed {
			session.set(filter_key, Value::Object(data));
		}

		for (field, value) in form.cleaned_data() {
			if is_empty_filter_value(value) {
				continue;
			}
			if form.kind_of(field).is_some_and(FilterKind::is_text) {
				let pattern = format!("%{}%", value.as_str().map_or_else(|| value.to_string(), str::to_string));
				self.query.filter_by(field, &Value::String(pattern), Criteria::Like)?;
			} else {
				self.query.filter_by(field, value, Criteria::Equal)?;
			}
		}
		Ok(())
	}

	/// Store one filter value in the session, as if it had been submitted
	pub fn set_filter_value(&self, name: impl Into<String>, value: Value) {
		let key = format!("{}.filter", self.session_name);
		self.context.session().with(|session| {
			let mut filters = match session.get(&key) {
				Some(Value::Object(stored)) => stored.clone(),
				_ => Map::new(),
			};
			filters.insert(name.into(), value);
			session.set(key, Value::Object(filters));
		});
	}

	/// Forget stored filter data
	pub fn reset_filters(&mut self) -> &mut Self {
		self.context.session().remove(&format!("{}.filter", self.session_name));
		self
	}

	/// The filter form, when filter fields are declared
	pub fn filter_form(&self) -> Option<&FilterForm> {
		self.filter.as_ref()
	}

	/// Render-ready view of the filter form
	pub fn filter_form_view(&self) -> Option<FilterFormView> {
		self.filter.as_ref().map(FilterForm::view)
	}

	// Sorting

	fn sort_key(&self) -> String {
		format!("{}.{}", self.session_name, self.params.sort)
	}

	fn stored_sort(&self) -> Option<SortState> {
		self.session_value::<SortState>(&self.sort_key())
			.filter(|sort| !sort.is_empty())
	}

	/// Sort state in effect: the stored one, or the default
	pub fn current_sort(&self) -> SortState {
		self.stored_sort().unwrap_or_else(|| self.definition.default_sort())
	}

	fn save_sort(&self, sort: &SortState) {
		let value = sort
			.iter()
			.map(|(column, order)| (column.clone(), Value::String(order.as_str().to_string())))
			.collect();
		self.context.session().set(self.sort_key(), Value::Object(value));
	}

	fn sort(&mut self) -> Result<()> {
		self.remove_sort();

		let mut sort = self.current_sort();
		let mut changed = false;
		if self.is_action(&self.params.sort) {
			let request = self.context.request();
			match request.get(&self.params.sort_column).filter(|column| !column.is_empty()) {
				Some(column) => {
					let order = match request.get(&self.params.sort_order) {
						Some(order) => order.parse::<SortOrder>()?,
						None => self.definition.default_sort_order(),
					};
					tracing::debug!(datagrid = %self.name(), column, %order, "sort datagrid");
					sort.insert(column.to_string(), order);
					changed = true;
				}
				None => {
					tracing::warn!(datagrid = %self.name(), "sort requested without a column");
				}
			}
		}

		self.query.clear_order();
		for (column, order) in &sort {
			self.query.order_by(column, *order)?;
		}

		if changed {
			self.save_sort(&sort);
		}
		Ok(())
	}

	/// Drop the requested column from the sort state when the request asks for it
	pub fn remove_sort(&mut self) -> &mut Self {
		if self.is_action(&self.params.remove_sort) {
			let mut sort = self.current_sort();
			if let Some(column) = self.context.request().get(&self.params.remove_sort_column) {
				tracing::debug!(datagrid = %self.name(), column, "remove sort column");
				sort.shift_remove(column);
			}
			self.save_sort(&sort);
		}
		self
	}

	/// Whether `column` takes part in the sort
	pub fn is_sorted_column(&self, column: &str) -> bool {
		self.current_sort().contains_key(column)
	}

	/// Order applied to `column`, if it is sorted on
	pub fn sorted_column_order(&self, column: &str) -> Option<SortOrder> {
		self.current_sort().get(column).copied()
	}

	/// 0-based priority of `column` in the sort, if it is sorted on
	pub fn sorted_column_priority(&self, column: &str) -> Option<usize> {
		self.current_sort().get_index_of(column)
	}

	/// Number of sorted columns
	pub fn sort_count(&self) -> usize {
		self.current_sort().len()
	}

	/// Forget the stored sort state
	pub fn reset_sort(&mut self) -> &mut Self {
		self.context.session().remove(&self.sort_key());
		self
	}

	// Paging

	/// Page to display
	///
	/// Taken from the request when it targets this datagrid, otherwise from
	/// the session, otherwise `default`. The result is stored in the session.
	/// Values that are not positive integers are ignored.
	pub fn current_page(&self, default: usize) -> usize {
		let key = format!("{}.{}", self.session_name, self.params.page);

		let requested = if self.targets_self() {
			self.context.request().get(&self.params.page).and_then(parse_page)
		} else {
			None
		};
		let page = requested
			.or_else(|| self.context.session().get(&key).as_ref().and_then(page_from_value))
			.unwrap_or(default);

		self.context.session().set(key, Value::from(page));
		page
	}

	/// Rows per page: the value set on this datagrid, else the settings default
	pub fn max_per_page(&self) -> usize {
		self.max_per_page
			.unwrap_or_else(|| self.context.settings().max_per_page)
	}

	/// Override the number of rows per page
	pub fn set_max_per_page(&mut self, max_per_page: usize) -> &mut Self {
		self.max_per_page = Some(max_per_page);
		self
	}

	// Columns

	fn columns_key(&self) -> String {
		format!("{}.columns", self.session_name)
	}

	/// Visible columns: the stored selection, or the defaults
	pub fn columns(&self) -> Columns {
		self.session_value::<Columns>(&self.columns_key())
			.unwrap_or_else(|| self.definition.default_columns())
	}

	/// Columns that could be added: appendable or default columns not currently shown
	pub fn available_appendable_columns(&self) -> Columns {
		let shown = self.columns();
		let mut available = Columns::new();
		for (column, label) in self
			.definition
			.appendable_columns()
			.into_iter()
			.chain(self.definition.default_columns())
		{
			if !shown.contains_key(&column) {
				available.insert(column, label);
			}
		}
		available
	}

	fn save_columns(&self, columns: &Columns) {
		let value = columns
			.iter()
			.map(|(column, label)| (column.clone(), Value::String(label.clone())))
			.collect();
		self.context.session().set(self.columns_key(), Value::Object(value));
	}

	fn manage_columns(&mut self) {
		if self.definition.default_columns().is_empty() {
			return;
		}
		self.remove_column();
		self.add_column();
	}

	fn remove_column(&self) {
		if !self.is_action(&self.params.remove_column_action) {
			return;
		}
		let Some(column) = self.context.request().get(&self.params.remove_column) else {
			return;
		};

		if self.definition.non_removable_columns().iter().any(|c| c == column) {
			tracing::warn!(datagrid = %self.name(), column, "refused to remove a non-removable column");
			return;
		}

		let mut columns = self.columns();
		if columns.shift_remove(column).is_some() {
			tracing::debug!(datagrid = %self.name(), column, "removed column");
			self.save_columns(&columns);
		}
	}

	fn add_column(&self) {
		if !self.is_action(&self.params.new_column_action) {
			return;
		}
		let request = self.context.request();
		let Some(new_column) = request.get(&self.params.new_column) else {
			return;
		};
		let preceding = request.get(&self.params.preceding_new_column);

		let Some(label) = self.available_appendable_columns().shift_remove(new_column) else {
			tracing::warn!(datagrid = %self.name(), column = new_column, "column cannot be added");
			return;
		};

		let columns = self.columns();
		let mut updated = Columns::with_capacity(columns.len() + 1);
		let mut inserted = false;
		for (column, column_label) in columns {
			let is_preceding = Some(column.as_str()) == preceding;
			updated.insert(column, column_label);
			if is_preceding && !inserted {
				updated.insert(new_column.to_string(), label.clone());
				inserted = true;
			}
		}
		if !inserted {
			updated.insert(new_column.to_string(), label);
		}

		tracing::debug!(datagrid = %self.name(), column = new_column, "added column");
		self.save_columns(&updated);
	}

	// Exports

	/// Run the export named `name` over the filtered and sorted query
	pub async fn export(&mut self, name: &str, params: &Map<String, Value>) -> Result<ExportOutput> {
		let exports = self.definition.exports();
		let export = exports
			.get(name)
			.ok_or_else(|| DatagridError::UnknownExport(name.to_string()))?;

		self.filter()?;
		self.sort()?;

		tracing::debug!(datagrid = %self.name(), export = name, "export datagrid");
		export.execute(&self.query, params).await
	}

	// Accessors

	/// The query builder
	pub fn query(&self) -> &D::Query {
		&self.query
	}

	/// The query builder, mutably
	pub fn query_mut(&mut self) -> &mut D::Query {
		&mut self.query
	}

	/// Replace the query builder
	pub fn set_query(&mut self, query: D::Query) -> &mut Self {
		self.query = query;
		self
	}

	/// The page read by [`execute`](Self::execute)
	pub fn results(&self) -> Option<&Pager<Row<D>>> {
		self.results.as_ref()
	}

	/// Alias of [`results`](Self::results)
	pub fn pager(&self) -> Option<&Pager<Row<D>>> {
		self.results()
	}

	/// Options the query was configured with
	pub fn options(&self) -> &Map<String, Value> {
		&self.options
	}

	/// Datagrid name
	pub fn name(&self) -> &str {
		self.definition.name()
	}

	/// Prefix of every session key of this datagrid
	pub fn session_name(&self) -> &str {
		&self.session_name
	}

	/// Request parameter vocabulary
	pub fn parameter_names(&self) -> &ParameterNames {
		&self.params
	}

	/// Request context
	pub fn context(&self) -> &DatagridContext {
		&self.context
	}

	/// Definition
	pub fn definition(&self) -> &D {
		&self.definition
	}

	// Routing

	/// Link to `page`
	pub fn pagination_path(&self, route: &str, page: usize, extra: &RouteParams) -> Result<String> {
		let params = &self.params;
		self.path(
			route,
			&params.page_action,
			[(params.page.as_str(), page.to_string())],
			extra,
		)
	}

	/// Link resetting filters and sort
	pub fn reset_path(&self, route: &str, extra: &RouteParams) -> Result<String> {
		self.path(route, &self.params.reset, std::iter::empty(), extra)
	}

	/// Link sorting on `column`
	pub fn sort_path(&self, route: &str, column: &str, order: SortOrder, extra: &RouteParams) -> Result<String> {
		let params = &self.params;
		self.path(
			route,
			&params.sort,
			[
				(params.sort_column.as_str(), column.to_string()),
				(params.sort_order.as_str(), order.to_string()),
			],
			extra,
		)
	}

	/// Link removing `column` from the sort
	pub fn remove_sort_path(&self, route: &str, column: &str, extra: &RouteParams) -> Result<String> {
		let params = &self.params;
		self.path(
			route,
			&params.remove_sort,
			[(params.remove_sort_column.as_str(), column.to_string())],
			extra,
		)
	}

	/// Link adding `new_column` after `preceding_column`
	pub fn new_column_path(
		&self,
		route: &str,
		new_column: &str,
		preceding_column: &str,
		extra: &RouteParams,
	) -> Result<String> {
		let params = &self.params;
		self.path(
			route,
			&params.new_column_action,
			[
				(params.new_column.as_str(), new_column.to_string()),
				(params.preceding_new_column.as_str(), preceding_column.to_string()),
			],
			extra,
		)
	}

	/// Link removing `column`
	pub fn remove_column_path(&self, route: &str, column: &str, extra: &RouteParams) -> Result<String> {
		let params = &self.params;
		self.path(
			route,
			&params.remove_column_action,
			[(params.remove_column.as_str(), column.to_string())],
			extra,
		)
	}

	fn path<'a>(
		&self,
		route: &str,
		action: &str,
		arguments: impl IntoIterator<Item = (&'a str, String)>,
		extra: &RouteParams,
	) -> Result<String> {
		let mut params = RouteParams::new();
		params.insert(self.params.action.clone(), action.to_string());
		params.insert(self.params.datagrid.clone(), self.name().to_string());
		for (name, value) in arguments {
			params.insert(name.to_string(), value);
		}
		for (name, value) in extra {
			params.insert(name.clone(), value.clone());
		}
		Ok(self.context.router().generate(route, &params)?)
	}

	// Request helpers

	fn targets_self(&self) -> bool {
		self.context.request().get(&self.params.datagrid) == Some(self.name())
	}

	fn is_action(&self, action: &str) -> bool {
		self.context.request().get(&self.params.action) == Some(action) && self.targets_self()
	}

	fn session_value<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
		match self.context.session().get_as::<T>(key) {
			Ok(value) => value,
			Err(error) => {
				tracing::warn!(datagrid = %self.name(), key, %error, "ignoring unreadable session value");
				None
			}
		}
	}
}

/// Values that do not constrain the query
///
/// Integer zero does constrain it; float zero and the string `"0"` do not.
fn is_empty_filter_value(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::Bool(flag) => !flag,
		Value::String(s) => s.is_empty() || s == "0",
		Value::Array(items) => items.is_empty(),
		Value::Object(map) => map.is_empty(),
		Value::Number(n) => !n.is_i64() && !n.is_u64() && n.as_f64() == Some(0.0),
	}
}

fn parse_page(raw: &str) -> Option<usize> {
	raw.trim().parse::<usize>().ok().filter(|page| *page > 0)
}

fn page_from_value(value: &Value) -> Option<usize> {
	match value {
		Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()).filter(|page| *page > 0),
		Value::String(s) => parse_page(s),
		_ => None,
	}
}
