//! Per-request services handed to a datagrid

use crate::settings::DatagridSettings;
use datagrid_http::{Request, SharedSession, UrlGenerator};
use std::fmt;
use std::sync::Arc;

/// The request, the URL generator and the settings a datagrid works with
#[derive(Clone)]
pub struct DatagridContext {
	request: Request,
	router: Arc<dyn UrlGenerator>,
	settings: Arc<DatagridSettings>,
}

impl fmt::Debug for DatagridContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DatagridContext")
			.field("request", &self.request)
			.field("settings", &self.settings)
			.finish_non_exhaustive()
	}
}

impl DatagridContext {
	/// Context with default settings
	pub fn new(request: Request, router: Arc<dyn UrlGenerator>) -> Self {
		Self {
			request,
			router,
			settings: Arc::new(DatagridSettings::default()),
		}
	}

	/// Replace the settings
	pub fn with_settings(mut self, settings: impl Into<Arc<DatagridSettings>>) -> Self {
		self.settings = settings.into();
		self
	}

	/// Current request
	pub fn request(&self) -> &Request {
		&self.request
	}

	/// Session of the current request
	pub fn session(&self) -> &SharedSession {
		self.request.session()
	}

	/// URL generator
	pub fn router(&self) -> &dyn UrlGenerator {
		self.router.as_ref()
	}

	/// Settings
	pub fn settings(&self) -> &DatagridSettings {
		&self.settings
	}
}
