//! Filter form binding and validation

use crate::error::{FormError, FormResult};
use crate::field::{FilterField, FilterKind};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// Key under which form-wide errors are collected
pub const ALL_FIELDS_KEY: &str = "_all";

type CleanFunction = Box<dyn Fn(&Map<String, Value>) -> FormResult<()> + Send + Sync>;

/// A datagrid filter form
///
/// Fields keep their declaration order. The form is unbound until
/// [`submit`](Self::submit) is called; an unbound form is never valid.
pub struct FilterForm {
	name: String,
	fields: IndexMap<String, FilterField>,
	data: Map<String, Value>,
	cleaned_data: Map<String, Value>,
	errors: IndexMap<String, Vec<String>>,
	is_bound: bool,
	clean_functions: Vec<CleanFunction>,
}

impl std::fmt::Debug for FilterForm {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FilterForm")
			.field("name", &self.name)
			.field("fields", &self.fields)
			.field("data", &self.data)
			.field("errors", &self.errors)
			.field("is_bound", &self.is_bound)
			.finish_non_exhaustive()
	}
}

impl FilterForm {
	/// Create an empty, unbound form
	///
	/// # Examples
	///
	/// ```
	/// use datagrid_forms::FilterForm;
	///
	/// let form = FilterForm::new("users");
	/// assert_eq!(form.name(), "users");
	/// assert!(!form.is_bound());
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			fields: IndexMap::new(),
			data: Map::new(),
			cleaned_data: Map::new(),
			errors: IndexMap::new(),
			is_bound: false,
			clean_functions: Vec::new(),
		}
	}

	/// Form name; submitted values are read from the `<name>[...]` request group
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Add a field, replacing any field with the same name
	pub fn add(&mut self, field: FilterField) -> &mut Self {
		self.fields.insert(field.name.clone(), field);
		self
	}

	/// Builder-style [`add`](Self::add)
	pub fn with_field(mut self, field: FilterField) -> Self {
		self.add(field);
		self
	}

	/// Look up a field by name
	pub fn field(&self, name: &str) -> Option<&FilterField> {
		self.fields.get(name)
	}

	/// All fields in declaration order
	pub fn fields(&self) -> impl Iterator<Item = &FilterField> {
		self.fields.values()
	}

	/// Kind of the named field
	pub fn kind_of(&self, name: &str) -> Option<&FilterKind> {
		self.fields.get(name).map(|field| &field.kind)
	}

	/// Register a form-wide validation rule
	///
	/// Rules run after every field cleaned successfully and receive the
	/// cleaned data. A failing rule records its message under
	/// [`ALL_FIELDS_KEY`].
	///
	/// # Examples
	///
	/// ```
	/// use datagrid_forms::{FilterField, FilterForm, FormError, ALL_FIELDS_KEY};
	/// use serde_json::{json, Map};
	///
	/// let mut form = FilterForm::new("range");
	/// form.add(FilterField::integer("min"));
	/// form.add(FilterField::integer("max"));
	/// form.add_clean_function(|data| {
	///     match (data.get("min").and_then(|v| v.as_i64()), data.get("max").and_then(|v| v.as_i64())) {
	///         (Some(min), Some(max)) if min > max => {
	///             Err(FormError::Validation("min must not exceed max".into()))
	///         }
	///         _ => Ok(()),
	///     }
	/// });
	///
	/// let mut data = Map::new();
	/// data.insert("min".into(), json!("9"));
	/// data.insert("max".into(), json!("3"));
	/// form.submit(data);
	///
	/// assert!(!form.is_valid());
	/// assert_eq!(form.errors()[ALL_FIELDS_KEY], vec!["min must not exceed max"]);
	/// ```
	pub fn add_clean_function<F>(&mut self, f: F) -> &mut Self
	where
		F: Fn(&Map<String, Value>) -> FormResult<()> + Send + Sync + 'static,
	{
		self.clean_functions.push(Box::new(f));
		self
	}

	/// Bind data to the form and validate it
	///
	/// Keys that do not name a declared field are ignored.
	pub fn submit(&mut self, data: Map<String, Value>) {
		self.data = data;
		self.is_bound = true;
		self.cleaned_data.clear();
		self.errors.clear();

		for (name, field) in &self.fields {
			match field.clean(self.data.get(name)) {
				Ok(value) => {
					self.cleaned_data.insert(name.clone(), value);
				}
				Err(error) => {
					self.errors.entry(name.clone()).or_default().push(error.to_string());
				}
			}
		}

		if self.errors.is_empty() {
			for clean in &self.clean_functions {
				if let Err(error) = clean(&self.cleaned_data) {
					let message = match error {
						FormError::Validation(message) => message,
						other => other.to_string(),
					};
					self.errors
						.entry(ALL_FIELDS_KEY.to_string())
						.or_default()
						.push(message);
				}
			}
		}

		if self.errors.is_empty() {
			tracing::debug!(form = %self.name, "filter form is valid");
		} else {
			tracing::debug!(form = %self.name, errors = ?self.errors, "filter form is invalid");
			self.cleaned_data.clear();
		}
	}

	/// Whether data has been submitted
	pub fn is_bound(&self) -> bool {
		self.is_bound
	}

	/// Whether the form is bound and has no errors
	pub fn is_valid(&self) -> bool {
		self.is_bound && self.errors.is_empty()
	}

	/// Cleaned values of a valid form, keyed by field name
	pub fn cleaned_data(&self) -> &Map<String, Value> {
		&self.cleaned_data
	}

	/// Errors keyed by field name (form-wide errors under [`ALL_FIELDS_KEY`])
	pub fn errors(&self) -> &IndexMap<String, Vec<String>> {
		&self.errors
	}

	/// Raw submitted data
	pub fn data(&self) -> &Map<String, Value> {
		&self.data
	}

	/// First error of a specific field as a [`FormError`]
	pub fn field_error(&self, name: &str) -> FormResult<()> {
		match self.errors.get(name).and_then(|errors| errors.first()) {
			Some(message) if name == ALL_FIELDS_KEY => Err(FormError::Validation(message.clone())),
			Some(message) => Err(FormError::Field {
				field: name.to_string(),
				error: crate::error::FieldError::Invalid(message.clone()),
			}),
			None => Ok(()),
		}
	}

	/// Render-ready snapshot of the form
	pub fn view(&self) -> FilterFormView {
		let fields = self
			.fields
			.values()
			.map(|field| FilterFieldView {
				name: field.name.clone(),
				full_name: format!("{}[{}]", self.name, field.name),
				label: field.label(),
				kind: field.kind.clone(),
				required: field.required,
				help_text: field.help_text.clone(),
				value: self
					.data
					.get(&field.name)
					.cloned()
					.or_else(|| (!self.is_bound).then(|| field.initial.clone()).flatten())
					.unwrap_or(Value::Null),
				errors: self.errors.get(&field.name).cloned().unwrap_or_default(),
			})
			.collect();

		FilterFormView {
			name: self.name.clone(),
			fields,
			errors: self.errors.get(ALL_FIELDS_KEY).cloned().unwrap_or_default(),
		}
	}
}

/// Serializable view of a [`FilterForm`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterFormView {
	/// Form name
	pub name: String,
	/// Field views in declaration order
	pub fields: Vec<FilterFieldView>,
	/// Form-wide errors
	pub errors: Vec<String>,
}

/// Serializable view of one filter field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterFieldView {
	/// Field name
	pub name: String,
	/// Input name, `form[field]`
	pub full_name: String,
	/// Display label
	pub label: String,
	/// Field kind
	pub kind: FilterKind,
	/// Whether the field is required
	pub required: bool,
	/// Help text
	pub help_text: Option<String>,
	/// Submitted value, or the initial value of an unbound form
	pub value: Value,
	/// Field errors
	pub errors: Vec<String>,
}
