//! Error types for request, session and routing operations

/// Errors raised while reading requests, sessions or generating URLs
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
	/// The request URI could not be parsed
	#[error("Invalid URI '{uri}': {message}")]
	InvalidUri {
		/// The rejected URI
		uri: String,
		/// Parser message
		message: String,
	},

	/// A query string or url-encoded body could not be decoded
	#[error("Invalid url-encoded data: {0}")]
	InvalidEncoding(String),

	/// No route is registered under the requested name
	#[error("Route '{0}' is not registered")]
	RouteNotFound(String),

	/// A path placeholder had no matching parameter
	#[error("Missing parameter '{param}' for route '{route}'")]
	MissingRouteParameter {
		/// Route name
		route: String,
		/// Placeholder name
		param: String,
	},

	/// A placeholder value would change the shape of the generated path
	#[error("Invalid value for route parameter '{0}'")]
	InvalidRouteParameter(String),

	/// A value stored in the session does not have the expected shape
	#[error("Session value '{key}' could not be decoded: {source}")]
	SessionValue {
		/// Session key
		key: String,
		/// Underlying decoding error
		#[source]
		source: serde_json::Error,
	},
}

/// Result type for this crate
pub type Result<T> = std::result::Result<T, HttpError>;
