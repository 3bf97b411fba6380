//! Exports run over the filtered and sorted query
#![cfg(feature = "export")]

mod common;

use common::{Client, UsersGrid};
use datagrid_core::{Datagrid, DatagridError};
use rstest::*;
use serde_json::{Map, Value, json};

#[fixture]
fn client() -> Client {
	Client::new()
}

#[rstest]
#[tokio::test]
async fn test_csv_export_uses_stored_filter_and_sort(client: Client) {
	client.session.set("datagrid.users.filter", json!({"role": "staff"}));
	client.session.set("datagrid.users.sort", json!({"id": "desc"}));

	let mut grid = Datagrid::create(UsersGrid::default(), client.get("/users/"));
	let output = grid.export("csv", &Map::new()).await.unwrap();

	assert_eq!(output.content_type, "text/csv");
	assert_eq!(output.filename, "users.csv");
	assert_eq!(
		String::from_utf8(output.body).unwrap(),
		"ID,Name\n7,frank\n3,carol\n2,bob\n"
	);
}

#[rstest]
#[tokio::test]
async fn test_json_export_ignores_pagination(client: Client) {
	let mut grid = Datagrid::create(UsersGrid::default(), client.get("/users/"));
	grid.set_max_per_page(2);

	let output = grid.export("json", &Map::new()).await.unwrap();
	let rows: Value = serde_json::from_slice(&output.body).unwrap();

	assert_eq!(output.content_type, "application/json");
	assert_eq!(rows.as_array().map(Vec::len), Some(7));
	assert_eq!(rows[0]["name"], json!("alice"));
}

#[rstest]
#[tokio::test]
async fn test_unknown_export(client: Client) {
	let mut grid = Datagrid::create(UsersGrid::default(), client.get("/users/"));

	let err = grid.export("pdf", &Map::new()).await.unwrap_err();
	assert!(matches!(err, DatagridError::UnknownExport(ref name) if name == "pdf"));
	assert_eq!(err.to_string(), "The \"pdf\" export doesn't exist in this datagrid");
}
