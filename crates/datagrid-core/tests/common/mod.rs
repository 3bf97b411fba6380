//! Common fixtures for datagrid-core tests

#![allow(dead_code)]

use datagrid_core::{Columns, DatagridContext, DatagridDefinition, DatagridSettings};
use datagrid_forms::FilterField;
use datagrid_http::{Method, Request, RouteTable, SharedSession};
use datagrid_query::{Criteria, DatagridQuery, MemoryQuery};
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;

/// Test user row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
	pub id: i64,
	pub name: String,
	pub role: String,
	pub active: bool,
	pub age: i64,
}

pub fn users() -> Vec<User> {
	[
		(1, "alice", "admin", true, 34),
		(2, "bob", "staff", true, 27),
		(3, "carol", "staff", false, 41),
		(4, "dave", "guest", true, 19),
		(5, "bobby", "guest", false, 27),
		(6, "erin", "admin", false, 52),
		(7, "frank", "staff", true, 33),
	]
	.into_iter()
	.map(|(id, name, role, active, age)| User {
		id,
		name: name.to_string(),
		role: role.to_string(),
		active,
		age,
	})
	.collect()
}

pub fn ids(rows: &[User]) -> Vec<i64> {
	rows.iter().map(|user| user.id).collect()
}

/// User listing with filters, column selection and exports
pub struct UsersGrid {
	pub default_filters: Map<String, Value>,
	pub manage_columns: bool,
}

impl Default for UsersGrid {
	fn default() -> Self {
		Self {
			default_filters: Map::new(),
			manage_columns: true,
		}
	}
}

impl DatagridDefinition for UsersGrid {
	type Query = MemoryQuery<User>;

	fn name(&self) -> &str {
		"users"
	}

	fn configure_query(&self, options: &Map<String, Value>) -> Self::Query {
		let mut query = MemoryQuery::new(users())
			.with_field("id", |u: &User| json!(u.id))
			.with_field("name", |u: &User| json!(u.name))
			.with_field("role", |u: &User| json!(u.role))
			.with_field("active", |u: &User| json!(u.active))
			.with_field("age", |u: &User| json!(u.age));
		if let Some(role) = options.get("only_role") {
			query.filter_by("role", role, Criteria::Equal).unwrap();
		}
		query
	}

	fn default_sort_column(&self) -> &str {
		"id"
	}

	fn configure_filter(&self) -> Vec<FilterField> {
		vec![
			FilterField::text("name"),
			FilterField::choice("role", [("admin", "Admin"), ("staff", "Staff"), ("guest", "Guest")]),
			FilterField::boolean("active"),
			FilterField::integer("age"),
		]
	}

	fn default_filters(&self) -> Map<String, Value> {
		self.default_filters.clone()
	}

	fn default_columns(&self) -> Columns {
		if !self.manage_columns {
			return Columns::new();
		}
		columns(&[("id", "ID"), ("name", "Name"), ("role", "Role")])
	}

	fn appendable_columns(&self) -> Columns {
		columns(&[("age", "Age"), ("active", "Active")])
	}

	fn non_removable_columns(&self) -> Vec<String> {
		vec!["id".to_string()]
	}

	#[cfg(feature = "export")]
	fn exports(&self) -> datagrid_core::Exports<Self::Query> {
		use datagrid_core::{CsvExport, Exports, JsonExport};

		let mut exports: Exports<Self::Query> = Exports::new();
		exports.insert(
			"csv".to_string(),
			Box::new(CsvExport::new(columns(&[("id", "ID"), ("name", "Name")])).with_filename("users.csv")),
		);
		exports.insert("json".to_string(), Box::new(JsonExport::new()));
		exports
	}
}

pub fn columns(pairs: &[(&str, &str)]) -> Columns {
	pairs
		.iter()
		.map(|(column, label)| (column.to_string(), label.to_string()))
		.collect()
}

/// A user agent: one session shared by successive requests
pub struct Client {
	pub session: SharedSession,
	pub router: Arc<RouteTable>,
	pub settings: Arc<DatagridSettings>,
}

impl Client {
	pub fn new() -> Self {
		Self::with_settings(DatagridSettings::default())
	}

	pub fn with_settings(settings: DatagridSettings) -> Self {
		Self {
			session: SharedSession::new(),
			router: Arc::new(
				RouteTable::new()
					.route("users", "/users/")
					.route("project_users", "/projects/{project}/users/"),
			),
			settings: Arc::new(settings),
		}
	}

	pub fn get(&self, uri: &str) -> DatagridContext {
		self.context(Method::GET, uri, "")
	}

	pub fn post(&self, uri: &str, body: &str) -> DatagridContext {
		self.context(Method::POST, uri, body)
	}

	fn context(&self, method: Method, uri: &str, body: &str) -> DatagridContext {
		let request = Request::builder()
			.method(method)
			.uri(uri)
			.body(body)
			.session(self.session.clone())
			.build()
			.unwrap();
		DatagridContext::new(request, self.router.clone()).with_settings(self.settings.clone())
	}
}
