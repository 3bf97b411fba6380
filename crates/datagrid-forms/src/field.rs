//! Filter field definitions and value cleaning

use crate::error::{FieldError, FieldResult};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Number, Value};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// How a filter field's submitted value is interpreted
///
/// The kind also decides how the datagrid filters the query: `Text` fields
/// are matched with `LIKE '%value%'`, every other kind with equality.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterKind {
	/// Free text, matched as a substring
	Text,
	/// One (or several) of a fixed set of values, keyed by value with a display label
	Choice {
		/// Allowed values and their labels
		choices: IndexMap<String, String>,
		/// Whether several values may be selected
		multiple: bool,
	},
	/// Checkbox-style flag
	Boolean,
	/// Whole number
	Integer,
	/// Decimal number
	Number,
	/// Calendar date in `YYYY-MM-DD` form
	Date,
}

impl FilterKind {
	/// Returns true for substring-matched text fields
	pub fn is_text(&self) -> bool {
		matches!(self, FilterKind::Text)
	}

	/// Short name of the kind, as exposed to templates
	pub fn as_str(&self) -> &'static str {
		match self {
			FilterKind::Text => "text",
			FilterKind::Choice { .. } => "choice",
			FilterKind::Boolean => "boolean",
			FilterKind::Integer => "integer",
			FilterKind::Number => "number",
			FilterKind::Date => "date",
		}
	}
}

/// A single field of a datagrid filter form
#[derive(Debug, Clone, PartialEq)]
pub struct FilterField {
	/// Field name, also the key passed to the query builder
	pub name: String,
	/// Value interpretation
	pub kind: FilterKind,
	/// Display label (humanized name when absent)
	pub label: Option<String>,
	/// Whether an empty value is an error
	pub required: bool,
	/// Help text shown next to the field
	pub help_text: Option<String>,
	/// Value shown before anything was submitted
	pub initial: Option<Value>,
}

impl FilterField {
	/// Create a field of the given kind
	pub fn new(name: impl Into<String>, kind: FilterKind) -> Self {
		Self {
			name: name.into(),
			kind,
			label: None,
			required: false,
			help_text: None,
			initial: None,
		}
	}

	/// Free-text field
	///
	/// # Examples
	///
	/// ```
	/// use datagrid_forms::{FilterField, FilterKind};
	///
	/// let field = FilterField::text("name").with_label("Full name");
	/// assert_eq!(field.kind, FilterKind::Text);
	/// assert_eq!(field.label(), "Full name");
	/// ```
	pub fn text(name: impl Into<String>) -> Self {
		Self::new(name, FilterKind::Text)
	}

	/// Single-choice field
	///
	/// # Examples
	///
	/// ```
	/// use datagrid_forms::FilterField;
	///
	/// let field = FilterField::choice("status", [("open", "Open"), ("closed", "Closed")]);
	/// assert_eq!(field.label(), "Status");
	/// ```
	pub fn choice<K, L>(name: impl Into<String>, choices: impl IntoIterator<Item = (K, L)>) -> Self
	where
		K: Into<String>,
		L: Into<String>,
	{
		Self::new(
			name,
			FilterKind::Choice {
				choices: collect_choices(choices),
				multiple: false,
			},
		)
	}

	/// Multiple-choice field; the cleaned value is an array
	pub fn multiple_choice<K, L>(
		name: impl Into<String>,
		choices: impl IntoIterator<Item = (K, L)>,
	) -> Self
	where
		K: Into<String>,
		L: Into<String>,
	{
		Self::new(
			name,
			FilterKind::Choice {
				choices: collect_choices(choices),
				multiple: true,
			},
		)
	}

	/// Boolean field
	pub fn boolean(name: impl Into<String>) -> Self {
		Self::new(name, FilterKind::Boolean)
	}

	/// Whole number field
	pub fn integer(name: impl Into<String>) -> Self {
		Self::new(name, FilterKind::Integer)
	}

	/// Decimal number field
	pub fn number(name: impl Into<String>) -> Self {
		Self::new(name, FilterKind::Number)
	}

	/// Date field
	pub fn date(name: impl Into<String>) -> Self {
		Self::new(name, FilterKind::Date)
	}

	/// Set the display label
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Set the help text
	pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
		self.help_text = Some(help_text.into());
		self
	}

	/// Set the initial value
	pub fn with_initial(mut self, initial: Value) -> Self {
		self.initial = Some(initial);
		self
	}

	/// Mark the field as required
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	/// Display label, humanized from the name when none was set
	pub fn label(&self) -> String {
		self.label.clone().unwrap_or_else(|| humanize_field_name(&self.name))
	}

	/// Clean a submitted value
	///
	/// Missing, `null` and blank values clean to `null` (or fail with
	/// [`FieldError::Required`] on required fields).
	///
	/// # Examples
	///
	/// ```
	/// use datagrid_forms::{FieldError, FilterField};
	/// use serde_json::json;
	///
	/// let field = FilterField::integer("age");
	/// assert_eq!(field.clean(Some(&json!(" 7 "))), Ok(json!(7)));
	/// assert_eq!(field.clean(None), Ok(json!(null)));
	/// assert!(matches!(field.clean(Some(&json!("seven"))), Err(FieldError::Invalid(_))));
	/// ```
	pub fn clean(&self, value: Option<&Value>) -> FieldResult<Value> {
		let cleaned = match value {
			None | Some(Value::Null) => Value::Null,
			Some(value) => match &self.kind {
				FilterKind::Text => clean_text(value)?,
				FilterKind::Choice { choices, multiple } => clean_choice(value, choices, *multiple)?,
				FilterKind::Boolean => clean_boolean(value)?,
				FilterKind::Integer => clean_integer(value)?,
				FilterKind::Number => clean_number(value)?,
				FilterKind::Date => clean_date(value)?,
			},
		};

		if self.required && is_blank(&cleaned) {
			return Err(FieldError::Required);
		}
		Ok(cleaned)
	}
}

fn collect_choices<K, L>(choices: impl IntoIterator<Item = (K, L)>) -> IndexMap<String, String>
where
	K: Into<String>,
	L: Into<String>,
{
	choices
		.into_iter()
		.map(|(value, label)| (value.into(), label.into()))
		.collect()
}

/// Turn `created_at` into `Created at`
pub(crate) fn humanize_field_name(name: &str) -> String {
	let spaced = name.replace('_', " ");
	let mut chars = spaced.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

fn is_blank(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::String(s) => s.is_empty(),
		Value::Array(items) => items.is_empty(),
		_ => false,
	}
}

/// Scalar value as trimmed text, `None` when blank
fn scalar_text(value: &Value) -> FieldResult<Option<String>> {
	let text = match value {
		Value::String(s) => s.trim().to_string(),
		Value::Number(n) => n.to_string(),
		Value::Bool(b) => b.to_string(),
		Value::Null => String::new(),
		Value::Array(_) | Value::Object(_) => {
			return Err(FieldError::Invalid("Enter a single value.".to_string()));
		}
	};
	Ok((!text.is_empty()).then_some(text))
}

fn clean_text(value: &Value) -> FieldResult<Value> {
	Ok(scalar_text(value)?.map(Value::String).unwrap_or(Value::Null))
}

fn clean_choice(value: &Value, choices: &IndexMap<String, String>, multiple: bool) -> FieldResult<Value> {
	let check = |candidate: String| -> FieldResult<Value> {
		if choices.contains_key(&candidate) {
			Ok(Value::String(candidate))
		} else {
			Err(FieldError::Invalid(format!(
				"Select a valid choice. {} is not one of the available choices.",
				candidate
			)))
		}
	};

	match (value, multiple) {
		(Value::Array(items), true) => {
			let mut selected = Vec::with_capacity(items.len());
			for item in items {
				if let Some(candidate) = scalar_text(item)? {
					selected.push(check(candidate)?);
				}
			}
			Ok(Value::Array(selected))
		}
		(Value::Array(_), false) => Err(FieldError::Invalid("Enter a single value.".to_string())),
		(scalar, true) => match scalar_text(scalar)? {
			Some(candidate) => Ok(Value::Array(vec![check(candidate)?])),
			None => Ok(Value::Array(Vec::new())),
		},
		(scalar, false) => match scalar_text(scalar)? {
			Some(candidate) => check(candidate),
			None => Ok(Value::Null),
		},
	}
}

fn clean_boolean(value: &Value) -> FieldResult<Value> {
	if let Value::Bool(b) = value {
		return Ok(Value::Bool(*b));
	}
	let Some(text) = scalar_text(value)? else {
		return Ok(Value::Bool(false));
	};
	match text.to_ascii_lowercase().as_str() {
		"1" | "true" | "on" | "yes" => Ok(Value::Bool(true)),
		"0" | "false" | "off" | "no" => Ok(Value::Bool(false)),
		_ => Err(FieldError::Invalid("Enter a valid boolean.".to_string())),
	}
}

fn clean_integer(value: &Value) -> FieldResult<Value> {
	if let Value::Number(n) = value
		&& let Some(i) = n.as_i64()
	{
		return Ok(Value::from(i));
	}
	match scalar_text(value)? {
		Some(text) => text
			.parse::<i64>()
			.map(Value::from)
			.map_err(|_| FieldError::Invalid("Enter a whole number.".to_string())),
		None => Ok(Value::Null),
	}
}

fn clean_number(value: &Value) -> FieldResult<Value> {
	let invalid = || FieldError::Invalid("Enter a number.".to_string());
	match scalar_text(value)? {
		Some(text) => {
			let parsed = text.parse::<f64>().map_err(|_| invalid())?;
			Number::from_f64(parsed).map(Value::Number).ok_or_else(invalid)
		}
		None => Ok(Value::Null),
	}
}

fn clean_date(value: &Value) -> FieldResult<Value> {
	match scalar_text(value)? {
		Some(text) => NaiveDate::parse_from_str(&text, DATE_FORMAT)
			.map(|date| Value::String(date.format(DATE_FORMAT).to_string()))
			.map_err(|_| FieldError::Invalid("Enter a valid date.".to_string())),
		None => Ok(Value::Null),
	}
}
