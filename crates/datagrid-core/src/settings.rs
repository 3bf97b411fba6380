//! Datagrid settings
//!
//! Settings are plain data: build them in code, parse them from TOML, then
//! optionally layer environment variables on top.
//!
//! ```toml
//! max_per_page = 50
//! session_prefix = "grids"
//! allowed_filter_methods = ["get", "post"]
//!
//! [parameter_names]
//! page = "p"
//! ```

use crate::error::{DatagridError, Result};
use crate::params::ParameterNames;
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`DatagridSettings::max_per_page`]
pub const ENV_MAX_PER_PAGE: &str = "DATAGRID_MAX_PER_PAGE";
/// Environment variable overriding [`DatagridSettings::session_prefix`]
pub const ENV_SESSION_PREFIX: &str = "DATAGRID_SESSION_PREFIX";
/// Environment variable overriding [`DatagridSettings::allowed_filter_methods`] (comma list)
pub const ENV_ALLOWED_FILTER_METHODS: &str = "DATAGRID_ALLOWED_FILTER_METHODS";

/// Defaults shared by every datagrid of an application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatagridSettings {
	/// Rows per page when a datagrid does not set its own
	pub max_per_page: usize,
	/// First segment of every datagrid session key
	pub session_prefix: String,
	/// Request methods whose filter submissions are honoured and remembered
	pub allowed_filter_methods: Vec<String>,
	/// Request parameter vocabulary
	pub parameter_names: ParameterNames,
}

impl Default for DatagridSettings {
	fn default() -> Self {
		Self {
			max_per_page: 30,
			session_prefix: "datagrid".to_string(),
			allowed_filter_methods: vec!["post".to_string()],
			parameter_names: ParameterNames::default(),
		}
	}
}

impl DatagridSettings {
	/// Parse settings from TOML; missing keys keep their defaults
	///
	/// # Examples
	///
	/// ```
	/// use datagrid_core::DatagridSettings;
	///
	/// let settings = DatagridSettings::from_toml_str(r#"
	///     max_per_page = 50
	///     [parameter_names]
	///     page = "p"
	/// "#).unwrap();
	///
	/// assert_eq!(settings.max_per_page, 50);
	/// assert_eq!(settings.session_prefix, "datagrid");
	/// assert_eq!(settings.parameter_names.page, "p");
	/// assert_eq!(settings.parameter_names.action, "action");
	/// ```
	pub fn from_toml_str(source: &str) -> Result<Self> {
		let settings: Self = toml::from_str(source)?;
		tracing::debug!(?settings, "loaded datagrid settings");
		Ok(settings)
	}

	/// Apply `DATAGRID_*` environment variables
	pub fn with_env_overrides(self) -> Result<Self> {
		self.with_overrides_from(|key| std::env::var(key).ok())
	}

	/// Apply overrides read through `lookup`, keyed by environment variable name
	///
	/// # Examples
	///
	/// ```
	/// use datagrid_core::DatagridSettings;
	///
	/// let settings = DatagridSettings::default()
	///     .with_overrides_from(|key| match key {
	///         "DATAGRID_MAX_PER_PAGE" => Some("10".to_string()),
	///         "DATAGRID_ALLOWED_FILTER_METHODS" => Some("get, post".to_string()),
	///         _ => None,
	///     })
	///     .unwrap();
	///
	/// assert_eq!(settings.max_per_page, 10);
	/// assert_eq!(settings.allowed_filter_methods, vec!["get", "post"]);
	/// ```
	pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		if let Some(value) = lookup(ENV_MAX_PER_PAGE) {
			self.max_per_page = value.trim().parse().map_err(|_| DatagridError::InvalidSetting {
				key: ENV_MAX_PER_PAGE.to_string(),
				value: value.clone(),
			})?;
		}

		if let Some(value) = lookup(ENV_SESSION_PREFIX) {
			let prefix = value.trim();
			if prefix.is_empty() {
				return Err(DatagridError::InvalidSetting {
					key: ENV_SESSION_PREFIX.to_string(),
					value,
				});
			}
			self.session_prefix = prefix.to_string();
		}

		if let Some(value) = lookup(ENV_ALLOWED_FILTER_METHODS) {
			self.allowed_filter_methods = value
				.split(',')
				.map(str::trim)
				.filter(|method| !method.is_empty())
				.map(str::to_string)
				.collect();
		}

		Ok(self)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_defaults() {
		let settings = DatagridSettings::default();
		assert_eq!(settings.max_per_page, 30);
		assert_eq!(settings.session_prefix, "datagrid");
		assert_eq!(settings.allowed_filter_methods, vec!["post"]);
		assert_eq!(settings.parameter_names, ParameterNames::default());
	}

	#[rstest]
	fn test_empty_toml_is_default() {
		assert_eq!(DatagridSettings::from_toml_str("").unwrap(), DatagridSettings::default());
	}

	#[rstest]
	fn test_malformed_toml() {
		let err = DatagridSettings::from_toml_str("max_per_page = \"many\"").unwrap_err();
		assert!(matches!(err, DatagridError::Settings(_)));
	}

	#[rstest]
	#[case(ENV_MAX_PER_PAGE, "lots")]
	#[case(ENV_SESSION_PREFIX, "  ")]
	fn test_invalid_overrides(#[case] key: &'static str, #[case] value: &'static str) {
		let err = DatagridSettings::default()
			.with_overrides_from(|k| (k == key).then(|| value.to_string()))
			.unwrap_err();
		assert!(matches!(err, DatagridError::InvalidSetting { key: k, .. } if k == key));
	}

	#[rstest]
	fn test_absent_overrides_keep_values() {
		let settings = DatagridSettings {
			max_per_page: 12,
			..DatagridSettings::default()
		}
		.with_overrides_from(|_| None)
		.unwrap();
		assert_eq!(settings.max_per_page, 12);
	}
}
