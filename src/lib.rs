//! # Datagrid
//!
//! Paginated, filterable, sortable data listings for Rust web applications,
//! with their state kept in the user's session.
//!
//! A datagrid sits between a request and a query builder. It reads the
//! request parameters and the session to decide which page, filters, sort
//! order and visible columns apply, pushes them into the query, and keeps
//! one page of results ready to render.
//!
//! ## Feature Flags
//!
//! - `standard` (default) - request, session, forms, query seam and the datagrid driver
//! - `sqlite` - SQLite query builder on `sqlx`
//! - `export` - CSV and JSON exports
//! - `full` - everything
//!
//! ## Quick Example
//!
//! ```rust
//! use datagrid::prelude::*;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! struct Books;
//!
//! impl DatagridDefinition for Books {
//!     type Query = MemoryQuery<(i64, &'static str)>;
//!
//!     fn name(&self) -> &str {
//!         "books"
//!     }
//!
//!     fn configure_query(&self, _options: &Map<String, Value>) -> Self::Query {
//!         MemoryQuery::new(vec![(1, "Emma"), (2, "Dune"), (3, "Ulysses")])
//!             .with_field("id", |book: &(i64, &'static str)| json!(book.0))
//!             .with_field("title", |book: &(i64, &'static str)| json!(book.1))
//!     }
//!
//!     fn default_sort_column(&self) -> &str {
//!         "id"
//!     }
//!
//!     fn configure_filter(&self) -> Vec<FilterField> {
//!         vec![FilterField::text("title")]
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), DatagridError> {
//! let routes = Arc::new(RouteTable::new().route("books", "/books/"));
//! let request = Request::builder()
//!     .uri("/books/?action=sort&datagrid=books&param1=id&param2=desc")
//!     .build()?;
//!
//! let mut grid = Datagrid::create(Books, DatagridContext::new(request, routes));
//! grid.execute().await?;
//!
//! let titles: Vec<_> = grid.pager().unwrap().iter().map(|book| book.1).collect();
//! assert_eq!(titles, vec!["Ulysses", "Dune", "Emma"]);
//! assert_eq!(
//!     grid.pagination_path("books", 2, &RouteParams::new())?,
//!     "/books/?action=page&datagrid=books&param1=2"
//! );
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Requests, sessions and URL generation
pub use datagrid_http as http;

/// Filter forms
pub use datagrid_forms as forms;

/// Query builder seam and pager
pub use datagrid_query as query;

pub use datagrid_forms::{FilterField, FilterForm, FilterFormView, FilterKind};
pub use datagrid_http::{
	InMemorySessionStore, Method, Request, RouteParams, RouteTable, Session, SessionStore,
	SharedSession, UrlGenerator,
};
pub use datagrid_query::{Criteria, DatagridQuery, MemoryQuery, Pager, SortOrder};
#[cfg(feature = "sqlite")]
pub use datagrid_query::SqliteQuery;

#[cfg(feature = "standard")]
pub use datagrid_core::{
	Columns, Datagrid, DatagridContext, DatagridDefinition, DatagridError, DatagridSettings, Export,
	ExportOutput, Exports, ParameterNames, SortState,
};
#[cfg(feature = "export")]
pub use datagrid_core::{CsvExport, JsonExport};

/// Prelude module for convenient imports
///
/// Import everything you need with `use datagrid::prelude::*;`
pub mod prelude {
	pub use crate::{
		Criteria, DatagridQuery, FilterField, FilterForm, FilterKind, MemoryQuery, Method, Pager,
		Request, RouteParams, RouteTable, SharedSession, SortOrder, UrlGenerator,
	};

	#[cfg(feature = "standard")]
	pub use crate::{
		Columns, Datagrid, DatagridContext, DatagridDefinition, DatagridError, DatagridSettings,
		Export, ExportOutput, Exports,
	};

	#[cfg(feature = "sqlite")]
	pub use crate::SqliteQuery;

	#[cfg(feature = "export")]
	pub use crate::{CsvExport, JsonExport};

	// External
	pub use async_trait::async_trait;
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map, Value};
}
