//! Form and field errors

/// Error produced while cleaning a single field value
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
	/// A required field was left empty
	#[error("This field is required.")]
	Required,
	/// The value could not be converted to the field's kind
	#[error("{0}")]
	Invalid(String),
}

/// Result type for field cleaning
pub type FieldResult<T> = Result<T, FieldError>;

/// Error produced by form-level validation
#[derive(Debug, thiserror::Error)]
pub enum FormError {
	/// A field failed to clean
	#[error("Field error in {field}: {error}")]
	Field {
		/// Field name
		field: String,
		/// Field error
		error: FieldError,
	},
	/// A form-wide rule failed
	#[error("Validation error: {0}")]
	Validation(String),
}

/// Result type for form operations
pub type FormResult<T> = Result<T, FormError>;
