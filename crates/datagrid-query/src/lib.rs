//! Query builder seam and pager for datagrids
//!
//! A datagrid never builds SQL itself. It hands cleaned filter values and
//! sort instructions to a [`DatagridQuery`], then asks it for one page of
//! results wrapped in a [`Pager`].
//!
//! Two implementations ship with the crate:
//!
//! - [`MemoryQuery`] over an in-memory `Vec`, with per-field predicates and comparators
//! - `SqliteQuery` (feature `sqlite`) rendering bound SQL through `sqlx`
//!
//! # Example
//!
//! ```rust
//! use datagrid_query::{Criteria, DatagridQuery, MemoryQuery, SortOrder};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> datagrid_query::Result<()> {
//! let mut query = MemoryQuery::new(vec![("bo", 31), ("al", 25), ("cy", 40), ("di", 25)])
//!     .with_field("name", |row| json!(row.0))
//!     .with_field("age", |row| json!(row.1));
//!
//! query.filter_by("age", &json!(25), Criteria::Equal)?;
//! query.order_by("name", SortOrder::Desc)?;
//!
//! let pager = query.paginate(1, 10).await?;
//! assert_eq!(pager.results(), &[("di", 25), ("al", 25)]);
//! assert_eq!(pager.total(), 2);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod criteria;
pub mod error;
pub mod memory;
pub mod pager;
pub mod query;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use criteria::{Criteria, SortOrder};
pub use error::{QueryError, Result};
pub use memory::MemoryQuery;
pub use pager::Pager;
pub use query::DatagridQuery;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteQuery;
