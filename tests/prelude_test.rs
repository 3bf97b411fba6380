//! The facade prelude is enough to define and drive a datagrid

use datagrid::prelude::*;
use rstest::*;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
struct Task {
	id: i64,
	title: &'static str,
	done: bool,
}

struct Tasks;

impl DatagridDefinition for Tasks {
	type Query = MemoryQuery<Task>;

	fn name(&self) -> &str {
		"tasks"
	}

	fn configure_query(&self, _options: &Map<String, Value>) -> Self::Query {
		MemoryQuery::new(vec![
			Task { id: 1, title: "write docs", done: true },
			Task { id: 2, title: "fix login", done: false },
			Task { id: 3, title: "fix logout", done: false },
		])
		.with_field("id", |t: &Task| json!(t.id))
		.with_field("title", |t: &Task| json!(t.title))
		.with_field("done", |t: &Task| json!(t.done))
	}

	fn default_sort_column(&self) -> &str {
		"id"
	}

	fn default_sort_order(&self) -> SortOrder {
		SortOrder::Desc
	}

	fn configure_filter(&self) -> Vec<FilterField> {
		vec![FilterField::text("title"), FilterField::boolean("done")]
	}
}

#[fixture]
fn routes() -> Arc<RouteTable> {
	Arc::new(RouteTable::new().route("tasks", "/projects/{project}/tasks/"))
}

#[rstest]
#[tokio::test]
async fn test_filter_then_page_links(routes: Arc<RouteTable>) {
	let session = SharedSession::new();
	let request = Request::builder()
		.method(Method::POST)
		.uri("/projects/9/tasks/")
		.body("tasks%5Btitle%5D=fix")
		.session(session.clone())
		.build()
		.unwrap();

	let mut grid = Datagrid::create(Tasks, DatagridContext::new(request, routes));
	grid.set_max_per_page(1);
	grid.execute().await.unwrap();

	let pager = grid.pager().unwrap();
	assert_eq!(pager.results()[0].id, 3);
	assert_eq!(pager.last_page(), 2);
	assert_eq!(session.get("datagrid.tasks.filter"), Some(json!({"title": "fix"})));

	let mut extra = RouteParams::new();
	extra.insert("project".to_string(), "9".to_string());
	assert_eq!(
		grid.pagination_path("tasks", pager.next_page(), &extra).unwrap(),
		"/projects/9/tasks/?action=page&datagrid=tasks&param1=2"
	);
}
