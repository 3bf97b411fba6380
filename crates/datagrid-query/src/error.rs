//! Query errors

/// Errors raised while configuring or running a datagrid query
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
	/// The query cannot filter on this field
	#[error("There is no filter for field \"{0}\" on this query")]
	UnknownFilter(String),

	/// The query cannot sort on this column
	#[error("There is no way to sort the datagrid on column \"{0}\"")]
	UnknownSortColumn(String),

	/// A sort order other than `asc` or `desc`
	#[error("Invalid sort order \"{0}\", expected \"asc\" or \"desc\"")]
	InvalidSortOrder(String),

	/// A filter value the backend cannot bind
	#[error("Unsupported value for field \"{field}\": {value}")]
	UnsupportedValue {
		/// Field being filtered
		field: String,
		/// Offending value, rendered as JSON
		value: String,
	},

	/// Database failure
	#[cfg(feature = "sqlite")]
	#[error("Database error: {0}")]
	Database(#[from] sqlx::Error),
}

/// Result type for query operations
pub type Result<T> = std::result::Result<T, QueryError>;
