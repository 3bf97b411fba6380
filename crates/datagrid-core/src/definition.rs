//! The datagrid definition trait

use crate::context::DatagridContext;
use crate::error::Result;
use crate::export::Exports;
use crate::params::ParameterNames;
use crate::settings::DatagridSettings;
use datagrid_forms::{FilterField, FilterForm};
use datagrid_query::{DatagridQuery, SortOrder};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Visible columns, keyed by column name, valued by label
pub type Columns = IndexMap<String, String>;

/// Sort state: column to order, highest priority first
pub type SortState = IndexMap<String, SortOrder>;

/// Describes one datagrid
///
/// Only the name, the query and the default sort column are required.
/// Everything else has a default that gives a plain paginated listing.
///
/// # Examples
///
/// ```
/// use datagrid_core::DatagridDefinition;
/// use datagrid_forms::FilterField;
/// use datagrid_query::MemoryQuery;
/// use serde_json::{json, Map, Value};
///
/// struct Fruits;
///
/// impl DatagridDefinition for Fruits {
///     type Query = MemoryQuery<&'static str>;
///
///     fn name(&self) -> &str {
///         "fruits"
///     }
///
///     fn configure_query(&self, _options: &Map<String, Value>) -> Self::Query {
///         MemoryQuery::new(vec!["pear", "apple", "fig"])
///             .with_field("name", |fruit: &&'static str| json!(fruit))
///     }
///
///     fn default_sort_column(&self) -> &str {
///         "name"
///     }
///
///     fn configure_filter(&self) -> Vec<FilterField> {
///         vec![FilterField::text("name")]
///     }
/// }
///
/// assert_eq!(Fruits.filter_form_name(), "fruits");
/// assert_eq!(Fruits.default_sort().len(), 1);
/// ```
pub trait DatagridDefinition: Send + Sync {
	/// Query builder type
	type Query: DatagridQuery;

	/// Unique name, used in session keys and request parameters
	fn name(&self) -> &str;

	/// Build the base query
	fn configure_query(&self, options: &Map<String, Value>) -> Self::Query;

	/// Column sorted on when nothing else is
	fn default_sort_column(&self) -> &str;

	/// Filter fields; no filter form is built when empty
	fn configure_filter(&self) -> Vec<FilterField> {
		Vec::new()
	}

	/// Adjust the filter form after its fields were added
	fn configure_filter_form(&self, _form: &mut FilterForm) {}

	/// Filter data used when neither the request nor the session has any
	fn default_filters(&self) -> Map<String, Value> {
		Map::new()
	}

	/// Request methods whose filter submissions are honoured
	fn allowed_filter_methods(&self, settings: &DatagridSettings) -> Vec<String> {
		settings.allowed_filter_methods.clone()
	}

	/// Order of the default sort column
	fn default_sort_order(&self) -> SortOrder {
		SortOrder::Asc
	}

	/// Sort state used when none is stored
	fn default_sort(&self) -> SortState {
		let mut sort = SortState::new();
		sort.insert(self.default_sort_column().to_string(), self.default_sort_order());
		sort
	}

	/// Initially visible columns; column management is off when empty
	fn default_columns(&self) -> Columns {
		Columns::new()
	}

	/// Columns that may be added on top of the defaults
	fn appendable_columns(&self) -> Columns {
		Columns::new()
	}

	/// Columns that can never be removed
	fn non_removable_columns(&self) -> Vec<String> {
		Vec::new()
	}

	/// Available exports, by name
	fn exports(&self) -> Exports<Self::Query> {
		Exports::new()
	}

	/// Request parameter vocabulary
	fn parameter_names(&self, settings: &DatagridSettings) -> ParameterNames {
		settings.parameter_names.clone()
	}

	/// Name of the filter form, hence of the request group holding its data
	fn filter_form_name(&self) -> String {
		self.name().to_string()
	}

	/// Called first thing in [`Datagrid::execute`](crate::Datagrid::execute)
	fn pre_execute(&self, _context: &DatagridContext, _query: &mut Self::Query) -> Result<()> {
		Ok(())
	}

	/// Called last thing in [`Datagrid::execute`](crate::Datagrid::execute)
	fn post_execute(&self, _context: &DatagridContext, _query: &mut Self::Query) -> Result<()> {
		Ok(())
	}
}
