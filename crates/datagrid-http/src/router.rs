//! URL generation for datagrid links
//!
//! Links such as "next page" or "sort by name" point back at the route that
//! renders the listing, carrying the datagrid action in extra parameters.
//! Path placeholders (`/projects/{project}/tasks/`) are filled from the
//! parameters; everything else becomes the query string.

use crate::error::{HttpError, Result};
use indexmap::IndexMap;

/// Ordered route parameters
pub type RouteParams = IndexMap<String, String>;

/// Generates URLs for named routes
pub trait UrlGenerator: Send + Sync {
	/// Generate the URL of `route` with the given parameters
	fn generate(&self, route: &str, params: &RouteParams) -> Result<String>;
}

/// Names of the `{placeholder}` segments of a route pattern, in order
///
/// Empty and unterminated braces are skipped.
///
/// ```
/// use datagrid_http::pattern_placeholders;
///
/// assert_eq!(pattern_placeholders("/shops/{shop}/orders/{order}/"), vec!["shop", "order"]);
/// assert!(pattern_placeholders("/orders/{}/{open").is_empty());
/// ```
pub fn pattern_placeholders(pattern: &str) -> Vec<&str> {
	pattern
		.split('{')
		.skip(1)
		.filter_map(|segment| segment.split_once('}'))
		.map(|(name, _)| name)
		.filter(|name| !name.is_empty())
		.collect()
}

/// Placeholder values must not change the path structure
fn validate_path_param(value: &str) -> bool {
	!value.is_empty() && !value.contains(['/', '?', '#', '%', '\\'])
}

/// A table of named routes
///
/// # Examples
///
/// ```
/// use datagrid_http::{RouteParams, RouteTable, UrlGenerator};
///
/// let routes = RouteTable::new().route("project_tasks", "/projects/{project}/tasks/");
///
/// let mut params = RouteParams::new();
/// params.insert("project".to_string(), "42".to_string());
/// params.insert("action".to_string(), "page".to_string());
/// params.insert("param1".to_string(), "3".to_string());
///
/// let url = routes.generate("project_tasks", &params).unwrap();
/// assert_eq!(url, "/projects/42/tasks/?action=page&param1=3");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
	routes: IndexMap<String, String>,
}

impl RouteTable {
	/// Create an empty route table
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a route, builder style
	pub fn route(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
		self.add(name, pattern);
		self
	}

	/// Register a route
	pub fn add(&mut self, name: impl Into<String>, pattern: impl Into<String>) {
		self.routes.insert(name.into(), pattern.into());
	}

	/// Pattern registered under `name`
	pub fn pattern(&self, name: &str) -> Option<&str> {
		self.routes.get(name).map(String::as_str)
	}
}

impl UrlGenerator for RouteTable {
	fn generate(&self, route: &str, params: &RouteParams) -> Result<String> {
		let pattern = self
			.routes
			.get(route)
			.ok_or_else(|| HttpError::RouteNotFound(route.to_string()))?;

		let placeholders = pattern_placeholders(pattern);
		let mut path = pattern.clone();
		for &name in &placeholders {
			let value = params.get(name).ok_or_else(|| HttpError::MissingRouteParameter {
				route: route.to_string(),
				param: name.to_string(),
			})?;
			if !validate_path_param(value) {
				return Err(HttpError::InvalidRouteParameter(name.to_string()));
			}
			path = path.replace(&format!("{{{}}}", name), value);
		}

		let query: Vec<(&str, &str)> = params
			.iter()
			.filter(|(key, _)| !placeholders.contains(&key.as_str()))
			.map(|(key, value)| (key.as_str(), value.as_str()))
			.collect();

		if query.is_empty() {
			return Ok(path);
		}

		let encoded =
			serde_urlencoded::to_string(&query).map_err(|e| HttpError::InvalidEncoding(e.to_string()))?;
		let separator = if path.contains('?') { '&' } else { '?' };
		Ok(format!("{}{}{}", path, separator, encoded))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn routes() -> RouteTable {
		RouteTable::new()
			.route("users", "/users/")
			.route("team_members", "/teams/{team}/members/")
	}

	fn params(pairs: &[(&str, &str)]) -> RouteParams {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[rstest]
	#[case("/users/", vec![])]
	#[case("/teams/{team}/members/{member}", vec!["team", "member"])]
	#[case("/teams/{}/members/{member", vec![])]
	fn test_pattern_placeholders(#[case] pattern: &str, #[case] expected: Vec<&str>) {
		assert_eq!(pattern_placeholders(pattern), expected);
	}

	#[rstest]
	fn test_generate_without_params(routes: RouteTable) {
		assert_eq!(routes.generate("users", &RouteParams::new()).unwrap(), "/users/");
	}

	#[rstest]
	fn test_generate_keeps_parameter_order(routes: RouteTable) {
		let url = routes
			.generate(
				"users",
				&params(&[("action", "sort"), ("datagrid", "users"), ("param1", "name"), ("param2", "asc")]),
			)
			.unwrap();
		assert_eq!(url, "/users/?action=sort&datagrid=users&param1=name&param2=asc");
	}

	#[rstest]
	fn test_generate_encodes_query_values(routes: RouteTable) {
		let url = routes
			.generate("users", &params(&[("q", "a b&c")]))
			.unwrap();
		assert_eq!(url, "/users/?q=a+b%26c");
	}

	#[rstest]
	fn test_generate_fills_placeholders(routes: RouteTable) {
		let url = routes
			.generate("team_members", &params(&[("team", "7"), ("action", "reset")]))
			.unwrap();
		assert_eq!(url, "/teams/7/members/?action=reset");
	}

	#[rstest]
	fn test_unknown_route(routes: RouteTable) {
		let result = routes.generate("missing", &RouteParams::new());
		assert!(matches!(result, Err(HttpError::RouteNotFound(name)) if name == "missing"));
	}

	#[rstest]
	fn test_missing_placeholder(routes: RouteTable) {
		let result = routes.generate("team_members", &RouteParams::new());
		assert!(matches!(result, Err(HttpError::MissingRouteParameter { param, .. }) if param == "team"));
	}

	#[rstest]
	#[case("../admin")]
	#[case("7?x=1")]
	#[case("7%2F8")]
	#[case("")]
	fn test_rejects_dangerous_placeholder_values(routes: RouteTable, #[case] value: &str) {
		let result = routes.generate("team_members", &params(&[("team", value)]));
		assert!(matches!(result, Err(HttpError::InvalidRouteParameter(_))));
	}
}
