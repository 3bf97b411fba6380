//! Request parameter vocabulary

use serde::{Deserialize, Serialize};

/// Names of the request parameters a datagrid reads and writes
///
/// A link such as "sort by name, descending" carries
/// `action=sort&datagrid=users&param1=name&param2=desc`. Every name here
/// can be changed, globally through the settings or per datagrid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterNames {
	/// Parameter holding the action
	pub action: String,
	/// Sort action value; also the session key suffix of the sort state
	pub sort: String,
	/// Remove-sort action value
	pub remove_sort: String,
	/// Page action value
	pub page_action: String,
	/// Parameter naming the targeted datagrid
	pub datagrid: String,
	/// Page number parameter; also the session key suffix of the page
	pub page: String,
	/// Reset action value
	pub reset: String,
	/// Column to sort on
	pub sort_column: String,
	/// Sort order
	pub sort_order: String,
	/// Column to stop sorting on
	pub remove_sort_column: String,
	/// Add-column action value
	pub new_column_action: String,
	/// Column to add
	pub new_column: String,
	/// Column after which the new column is inserted
	pub preceding_new_column: String,
	/// Remove-column action value
	pub remove_column_action: String,
	/// Column to remove
	pub remove_column: String,
}

impl Default for ParameterNames {
	fn default() -> Self {
		Self {
			action: "action".to_string(),
			sort: "sort".to_string(),
			remove_sort: "remove-sort".to_string(),
			page_action: "page".to_string(),
			datagrid: "datagrid".to_string(),
			page: "param1".to_string(),
			reset: "reset".to_string(),
			sort_column: "param1".to_string(),
			sort_order: "param2".to_string(),
			remove_sort_column: "param1".to_string(),
			new_column_action: "add-column".to_string(),
			new_column: "param1".to_string(),
			preceding_new_column: "param2".to_string(),
			remove_column_action: "remove-column".to_string(),
			remove_column: "param1".to_string(),
		}
	}
}
