//! Datagrid errors

use datagrid_forms::FormError;
use datagrid_http::HttpError;
use datagrid_query::QueryError;

/// Errors raised while driving a datagrid
#[derive(Debug, thiserror::Error)]
pub enum DatagridError {
	/// Request, session or routing failure
	#[error(transparent)]
	Http(#[from] HttpError),

	/// Filter form failure
	#[error(transparent)]
	Form(#[from] FormError),

	/// Query builder failure
	#[error(transparent)]
	Query(#[from] QueryError),

	/// The requested export is not declared by the datagrid
	#[error("The \"{0}\" export doesn't exist in this datagrid")]
	UnknownExport(String),

	/// An export could not be produced
	#[error("Export failed: {0}")]
	Export(String),

	/// Rows could not be serialized for export
	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	/// The settings file could not be parsed
	#[error("Invalid datagrid settings: {0}")]
	Settings(#[from] toml::de::Error),

	/// A settings override carried an unusable value
	#[error("Invalid value for {key}: {value}")]
	InvalidSetting {
		/// Setting or environment variable name
		key: String,
		/// Rejected value
		value: String,
	},
}

#[cfg(feature = "export")]
impl From<csv::Error> for DatagridError {
	fn from(error: csv::Error) -> Self {
		DatagridError::Export(error.to_string())
	}
}

/// Result type for datagrid operations
pub type Result<T> = std::result::Result<T, DatagridError>;
