//! Filter forms for datagrids
//!
//! A datagrid's filter is a small form: each field has a kind that decides
//! how the submitted string is cleaned (and, later, whether the query is
//! filtered with `LIKE` or equality). This crate binds submitted or
//! session-stored data to such a form and validates it.
//!
//! # Example
//!
//! ```rust
//! use datagrid_forms::{FilterField, FilterForm};
//! use serde_json::json;
//!
//! let mut form = FilterForm::new("users");
//! form.add(FilterField::text("name"));
//! form.add(FilterField::integer("age"));
//!
//! let data = json!({"name": "  ali ", "age": "42"});
//! form.submit(data.as_object().unwrap().clone());
//!
//! assert!(form.is_valid());
//! assert_eq!(form.cleaned_data().get("name"), Some(&json!("ali")));
//! assert_eq!(form.cleaned_data().get("age"), Some(&json!(42)));
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod field;
pub mod form;

pub use error::{FieldError, FieldResult, FormError, FormResult};
pub use field::{FilterField, FilterKind};
pub use form::{ALL_FIELDS_KEY, FilterFieldView, FilterForm, FilterFormView};
