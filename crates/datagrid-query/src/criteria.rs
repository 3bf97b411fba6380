//! Filter criteria and sort order

use crate::error::{QueryError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// How a filter value is compared with a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Criteria {
	/// `column = value`, or `column IN (...)` for arrays
	#[default]
	Equal,
	/// `column LIKE value`, with `%` and `_` wildcards
	Like,
}

impl Criteria {
	/// SQL operator for scalar values
	pub fn as_sql(&self) -> &'static str {
		match self {
			Criteria::Equal => "=",
			Criteria::Like => "LIKE",
		}
	}

	/// Evaluate the criteria against an in-memory value
	///
	/// `Like` follows SQLite semantics: ASCII case-insensitive, `%` matches
	/// any run of characters and `_` exactly one.
	///
	/// # Examples
	///
	/// ```
	/// use datagrid_query::Criteria;
	/// use serde_json::json;
	///
	/// assert!(Criteria::Like.matches(&json!("Bob Smith"), &json!("%smi%")));
	/// assert!(Criteria::Equal.matches(&json!(3), &json!([1, 3])));
	/// assert!(Criteria::Equal.matches(&json!(3), &json!("3")));
	/// assert!(!Criteria::Equal.matches(&json!("a"), &json!("b")));
	/// ```
	pub fn matches(&self, candidate: &Value, needle: &Value) -> bool {
		match (self, needle) {
			(_, Value::Array(options)) => options.iter().any(|option| self.matches(candidate, option)),
			(Criteria::Equal, needle) => loose_eq(candidate, needle),
			(Criteria::Like, needle) => like_match(&value_text(candidate), &value_text(needle)),
		}
	}
}

impl fmt::Display for Criteria {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_sql())
	}
}

fn value_text(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		Value::Null => String::new(),
		other => other.to_string(),
	}
}

fn loose_eq(a: &Value, b: &Value) -> bool {
	if a == b {
		return true;
	}
	match (a, b) {
		(Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
		(Value::Bool(flag), Value::Number(n)) | (Value::Number(n), Value::Bool(flag)) => {
			n.as_i64() == Some(i64::from(*flag))
		}
		(Value::Null, _) | (_, Value::Null) => false,
		_ => value_text(a) == value_text(b),
	}
}

fn like_match(text: &str, pattern: &str) -> bool {
	let text: Vec<char> = text.chars().map(|c| c.to_ascii_lowercase()).collect();
	let pattern: Vec<char> = pattern.chars().map(|c| c.to_ascii_lowercase()).collect();

	// matched[j]: pattern[..j] matches the text consumed so far
	let mut matched = vec![false; pattern.len() + 1];
	matched[0] = true;
	for j in 1..=pattern.len() {
		matched[j] = matched[j - 1] && pattern[j - 1] == '%';
	}

	for &c in &text {
		let mut next = vec![false; pattern.len() + 1];
		for j in 1..=pattern.len() {
			next[j] = match pattern[j - 1] {
				'%' => next[j - 1] || matched[j],
				'_' => matched[j - 1],
				p => matched[j - 1] && p == c,
			};
		}
		matched = next;
	}

	matched[pattern.len()]
}

/// Order for a sorted column, stored lowercase
///
/// # Examples
///
/// ```
/// use datagrid_query::SortOrder;
///
/// assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Desc);
/// assert_eq!(SortOrder::Asc.to_string(), "asc");
/// assert!("up".parse::<SortOrder>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
	/// Ascending
	#[default]
	Asc,
	/// Descending
	Desc,
}

impl SortOrder {
	/// Lowercase name
	pub fn as_str(&self) -> &'static str {
		match self {
			SortOrder::Asc => "asc",
			SortOrder::Desc => "desc",
		}
	}

	/// SQL keyword
	pub fn as_sql(&self) -> &'static str {
		match self {
			SortOrder::Asc => "ASC",
			SortOrder::Desc => "DESC",
		}
	}

	/// The other direction
	pub fn reverse(self) -> Self {
		match self {
			SortOrder::Asc => SortOrder::Desc,
			SortOrder::Desc => SortOrder::Asc,
		}
	}

	/// Apply this order to an ascending comparison
	pub fn apply(&self, ordering: Ordering) -> Ordering {
		match self {
			SortOrder::Asc => ordering,
			SortOrder::Desc => ordering.reverse(),
		}
	}
}

impl fmt::Display for SortOrder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for SortOrder {
	type Err = QueryError;

	fn from_str(s: &str) -> Result<Self> {
		match s.trim().to_ascii_lowercase().as_str() {
			"asc" => Ok(SortOrder::Asc),
			"desc" => Ok(SortOrder::Desc),
			_ => Err(QueryError::InvalidSortOrder(s.to_string())),
		}
	}
}

/// Compare two JSON values for sorting
///
/// Nulls sort first, then booleans, numbers and strings; mixed kinds fall
/// back to their textual form.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
	fn rank(value: &Value) -> u8 {
		match value {
			Value::Null => 0,
			Value::Bool(_) => 1,
			Value::Number(_) => 2,
			Value::String(_) => 3,
			Value::Array(_) => 4,
			Value::Object(_) => 5,
		}
	}

	match (a, b) {
		(Value::Bool(x), Value::Bool(y)) => x.cmp(y),
		(Value::Number(x), Value::Number(y)) => {
			let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
			x.partial_cmp(&y).unwrap_or(Ordering::Equal)
		}
		(Value::String(x), Value::String(y)) => x.cmp(y),
		_ if rank(a) != rank(b) => rank(a).cmp(&rank(b)),
		_ => value_text(a).cmp(&value_text(b)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case("hello", "hello", true)]
	#[case("hello", "HEL%", true)]
	#[case("hello", "%ll%", true)]
	#[case("hello", "h_llo", true)]
	#[case("hello", "h_lo", false)]
	#[case("hello", "%", true)]
	#[case("", "%", true)]
	#[case("", "_", false)]
	#[case("abc", "%c%d", false)]
	fn test_like_match(#[case] text: &str, #[case] pattern: &str, #[case] expected: bool) {
		assert_eq!(like_match(text, pattern), expected);
	}

	#[rstest]
	#[case(json!(1), json!(1.0), true)]
	#[case(json!(true), json!(1), true)]
	#[case(json!(false), json!(true), false)]
	#[case(json!("12"), json!(12), true)]
	#[case(json!(null), json!(""), false)]
	fn test_loose_eq(#[case] a: Value, #[case] b: Value, #[case] expected: bool) {
		assert_eq!(loose_eq(&a, &b), expected);
	}

	#[rstest]
	#[case("asc", SortOrder::Asc)]
	#[case(" Desc ", SortOrder::Desc)]
	#[case("ASC", SortOrder::Asc)]
	fn test_sort_order_parse(#[case] input: &str, #[case] expected: SortOrder) {
		assert_eq!(input.parse::<SortOrder>().unwrap(), expected);
	}

	#[rstest]
	fn test_invalid_sort_order() {
		let err = "sideways".parse::<SortOrder>().unwrap_err();
		assert!(matches!(err, QueryError::InvalidSortOrder(ref s) if s == "sideways"));
	}

	#[rstest]
	fn test_sort_order_serializes_lowercase() {
		assert_eq!(serde_json::to_value(SortOrder::Desc).unwrap(), json!("desc"));
		let parsed: SortOrder = serde_json::from_value(json!("asc")).unwrap();
		assert_eq!(parsed, SortOrder::Asc);
	}

	#[rstest]
	fn test_compare_values_orders_kinds() {
		let mut values = vec![json!("b"), json!(2), json!(null), json!("a"), json!(1.5), json!(true)];
		values.sort_by(compare_values);
		assert_eq!(values, vec![json!(null), json!(true), json!(1.5), json!(2), json!("a"), json!("b")]);
	}
}
