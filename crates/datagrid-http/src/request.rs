//! Request parameter access
//!
//! Parameters are looked up the way the datagrid expects from a framework
//! "parameter bag": the query string first, then the url-encoded body.

use crate::error::{HttpError, Result};
use crate::session::SharedSession;
use hyper::{Method, Uri};
use serde_json::{Map, Value};

type Params = Vec<(String, String)>;

/// An incoming request as seen by a datagrid
///
/// Holds the method, the path, decoded query and body parameters in their
/// original order, and the session attached to the user agent.
#[derive(Debug, Clone)]
pub struct Request {
	method: Method,
	path: String,
	query_params: Params,
	body_params: Params,
	session: SharedSession,
}

impl Request {
	/// Start building a request
	///
	/// # Examples
	///
	/// ```
	/// use datagrid_http::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::POST)
	///     .uri("/users")
	///     .body("users[name]=alice")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.method(), &Method::POST);
	/// assert_eq!(request.path(), "/users");
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	/// HTTP method of the request
	pub fn method(&self) -> &Method {
		&self.method
	}

	/// Request path without the query string
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Session attached to this request
	pub fn session(&self) -> &SharedSession {
		&self.session
	}

	/// Decoded query string parameters, in order of appearance
	pub fn query_params(&self) -> &[(String, String)] {
		&self.query_params
	}

	/// Decoded body parameters, in order of appearance
	pub fn body_params(&self) -> &[(String, String)] {
		&self.body_params
	}

	/// Get a parameter by name
	///
	/// The query string wins over the body. When a name is repeated, the
	/// last occurrence is returned.
	///
	/// # Examples
	///
	/// ```
	/// use datagrid_http::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::POST)
	///     .uri("/users?page=2")
	///     .body("page=3&name=bob")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.get("page"), Some("2"));
	/// assert_eq!(request.get("name"), Some("bob"));
	/// assert_eq!(request.get("missing"), None);
	/// ```
	pub fn get(&self, name: &str) -> Option<&str> {
		last_value(&self.query_params, name).or_else(|| last_value(&self.body_params, name))
	}

	/// Returns true if a parameter with this name is present in either bag
	pub fn has(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	/// Collect bracketed parameters such as `filter[name]=x` into a map
	///
	/// `prefix[key]=v` produces a string value; `prefix[key][]=v` accumulates
	/// an array. The query string is consulted first; the body is only used
	/// when the query string carries no parameter for the prefix. Returns
	/// `None` when neither does.
	///
	/// # Examples
	///
	/// ```
	/// use datagrid_http::Request;
	/// use hyper::Method;
	/// use serde_json::json;
	///
	/// let request = Request::builder()
	///     .method(Method::POST)
	///     .uri("/users")
	///     .body("users[name]=ali&users[roles][]=admin&users[roles][]=staff")
	///     .build()
	///     .unwrap();
	///
	/// let data = request.get_group("users").unwrap();
	/// assert_eq!(data.get("name"), Some(&json!("ali")));
	/// assert_eq!(data.get("roles"), Some(&json!(["admin", "staff"])));
	/// assert!(request.get_group("posts").is_none());
	/// ```
	pub fn get_group(&self, prefix: &str) -> Option<Map<String, Value>> {
		collect_group(&self.query_params, prefix).or_else(|| collect_group(&self.body_params, prefix))
	}

	/// Returns true if the request method is one of `methods`, compared case-insensitively
	///
	/// # Examples
	///
	/// ```
	/// use datagrid_http::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder().method(Method::POST).uri("/").build().unwrap();
	/// assert!(request.method_in(&["get", "post"]));
	/// assert!(!request.method_in(&["get"]));
	/// ```
	pub fn method_in<S: AsRef<str>>(&self, methods: &[S]) -> bool {
		methods
			.iter()
			.any(|m| m.as_ref().eq_ignore_ascii_case(self.method.as_str()))
	}
}

fn last_value<'a>(params: &'a Params, name: &str) -> Option<&'a str> {
	params
		.iter()
		.rev()
		.find(|(key, _)| key == name)
		.map(|(_, value)| value.as_str())
}

/// Split `prefix[key]` / `prefix[key][]` into the key and an "is array" flag
fn parse_group_key<'a>(key: &'a str, prefix: &str) -> Option<(&'a str, bool)> {
	let rest = key.strip_prefix(prefix)?.strip_prefix('[')?;
	let (name, tail) = rest.split_once(']')?;
	if name.is_empty() {
		return None;
	}
	match tail {
		"" => Some((name, false)),
		"[]" => Some((name, true)),
		_ => None,
	}
}

fn collect_group(params: &Params, prefix: &str) -> Option<Map<String, Value>> {
	let mut group = Map::new();
	let mut found = false;

	for (key, value) in params {
		let Some((name, is_array)) = parse_group_key(key, prefix) else {
			continue;
		};
		found = true;

		if is_array {
			let entry = group
				.entry(name.to_string())
				.or_insert_with(|| Value::Array(Vec::new()));
			match entry {
				Value::Array(items) => items.push(Value::String(value.clone())),
				other => *other = Value::Array(vec![Value::String(value.clone())]),
			}
		} else {
			group.insert(name.to_string(), Value::String(value.clone()));
		}
	}

	found.then_some(group)
}

fn decode_params(encoded: &str) -> Result<Params> {
	if encoded.is_empty() {
		return Ok(Vec::new());
	}
	serde_urlencoded::from_str::<Params>(encoded).map_err(|e| HttpError::InvalidEncoding(e.to_string()))
}

/// Builder for [`Request`]
#[derive(Debug, Default)]
pub struct RequestBuilder {
	method: Option<Method>,
	uri: Option<String>,
	body: Option<String>,
	session: Option<SharedSession>,
}

impl RequestBuilder {
	/// Set the HTTP method (defaults to GET)
	pub fn method(mut self, method: Method) -> Self {
		self.method = Some(method);
		self
	}

	/// Set the request URI, including its query string
	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = Some(uri.into());
		self
	}

	/// Set an `application/x-www-form-urlencoded` body
	pub fn body(mut self, body: impl Into<String>) -> Self {
		self.body = Some(body.into());
		self
	}

	/// Attach a session (a fresh empty session is used otherwise)
	pub fn session(mut self, session: SharedSession) -> Self {
		self.session = Some(session);
		self
	}

	/// Parse the URI and body and build the request
	///
	/// # Errors
	///
	/// Returns [`HttpError::InvalidUri`] for an unparseable URI and
	/// [`HttpError::InvalidEncoding`] for malformed url-encoded data.
	pub fn build(self) -> Result<Request> {
		let raw_uri = self.uri.unwrap_or_else(|| "/".to_string());
		let uri = raw_uri.parse::<Uri>().map_err(|e| HttpError::InvalidUri {
			uri: raw_uri.clone(),
			message: e.to_string(),
		})?;

		let query_params = decode_params(uri.query().unwrap_or(""))?;
		let body_params = decode_params(self.body.as_deref().unwrap_or(""))?;

		Ok(Request {
			method: self.method.unwrap_or(Method::GET),
			path: uri.path().to_string(),
			query_params,
			body_params,
			session: self.session.unwrap_or_default(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case("filter[name]", Some(("name", false)))]
	#[case("filter[tags][]", Some(("tags", true)))]
	#[case("filter[]", None)]
	#[case("filter", None)]
	#[case("filters[name]", None)]
	#[case("filter[a][b]", None)]
	fn test_parse_group_key(#[case] key: &str, #[case] expected: Option<(&str, bool)>) {
		assert_eq!(parse_group_key(key, "filter"), expected);
	}

	#[rstest]
	fn test_query_string_is_percent_decoded() {
		let request = Request::builder()
			.uri("/search?q=John%20Doe&tag=a+b")
			.build()
			.unwrap();

		assert_eq!(request.get("q"), Some("John Doe"));
		assert_eq!(request.get("tag"), Some("a b"));
	}

	#[rstest]
	fn test_repeated_parameter_returns_last_value() {
		let request = Request::builder().uri("/?page=1&page=4").build().unwrap();
		assert_eq!(request.get("page"), Some("4"));
	}

	#[rstest]
	fn test_group_prefers_query_string_over_body() {
		let request = Request::builder()
			.method(Method::POST)
			.uri("/?grid%5Bname%5D=query")
			.body("grid[name]=body&grid[age]=3")
			.build()
			.unwrap();

		let group = request.get_group("grid").unwrap();
		assert_eq!(group.get("name"), Some(&json!("query")));
		assert!(group.get("age").is_none());
	}

	#[rstest]
	fn test_default_method_is_get() {
		let request = Request::builder().build().unwrap();
		assert_eq!(request.method(), &Method::GET);
		assert_eq!(request.path(), "/");
	}

	#[rstest]
	fn test_invalid_uri_is_rejected() {
		let result = Request::builder().uri("/with space").build();
		assert!(matches!(result, Err(HttpError::InvalidUri { .. })));
	}
}
