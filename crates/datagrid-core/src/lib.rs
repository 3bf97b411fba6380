//! Session-backed paging, filtering, sorting and column selection
//!
//! Implement [`DatagridDefinition`] for a listing, bind it to a request with
//! [`Datagrid::create`], then call [`Datagrid::execute`]. The datagrid
//! reads the request and the session, configures the query and keeps one
//! page of results.
//!
//! Every datagrid action is a plain link. Links carry an action, the name
//! of the targeted datagrid, and up to two arguments; the
//! `*_path` helpers build them through the application's router. State
//! outlives the request in the session, under keys prefixed with
//! `datagrid.<name>`.
//!
//! | action          | arguments               | effect                              |
//! |-----------------|-------------------------|-------------------------------------|
//! | `page`          | page                    | show another page                   |
//! | `sort`          | column, order           | add or update a sorted column       |
//! | `remove-sort`   | column                  | stop sorting on a column            |
//! | `add-column`    | column, preceding column| show an extra column                |
//! | `remove-column` | column                  | hide a column                       |
//! | `reset`         |                         | forget stored filters and sort      |
//!
//! Filter forms are submitted as `<form name>[<field>]=<value>` with one of
//! the allowed request methods (`POST` unless configured otherwise).

#![warn(missing_docs)]

pub mod context;
pub mod datagrid;
pub mod definition;
pub mod error;
pub mod export;
pub mod params;
pub mod settings;

pub use context::DatagridContext;
pub use datagrid::Datagrid;
pub use definition::{Columns, DatagridDefinition, SortState};
pub use error::{DatagridError, Result};
#[cfg(feature = "export")]
pub use export::{CsvExport, JsonExport};
pub use export::{Export, ExportOutput, Exports};
pub use params::ParameterNames;
pub use settings::DatagridSettings;
