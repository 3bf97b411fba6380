//! Session storage
//!
//! Datagrids keep their page, filter, sort and column choices in the user's
//! session under dotted keys such as `datagrid.users.filter`. The session is
//! an ordered JSON map so that stored sort priorities survive a round trip.

use crate::error::{HttpError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Session ID type
pub type SessionId = String;

/// Session data stored in the backend
///
/// # Examples
///
/// ```
/// use datagrid_http::Session;
/// use serde_json::json;
///
/// let mut session = Session::new();
/// session.set("datagrid.users.param1", json!(2));
/// assert_eq!(session.get("datagrid.users.param1"), Some(&json!(2)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
	data: Map<String, Value>,
}

impl Session {
	/// Create a new empty session
	pub fn new() -> Self {
		Self::default()
	}

	/// Set a raw JSON value
	pub fn set(&mut self, key: impl Into<String>, value: Value) {
		self.data.insert(key.into(), value);
	}

	/// Serialize and store a value
	///
	/// # Examples
	///
	/// ```
	/// use datagrid_http::Session;
	///
	/// let mut session = Session::new();
	/// session.set_as("columns", &vec!["id", "name"]).unwrap();
	/// let columns: Vec<String> = session.get_as("columns").unwrap().unwrap();
	/// assert_eq!(columns, vec!["id", "name"]);
	/// ```
	pub fn set_as<T: Serialize + ?Sized>(&mut self, key: impl Into<String>, value: &T) -> Result<()> {
		let key = key.into();
		let value = serde_json::to_value(value).map_err(|source| HttpError::SessionValue {
			key: key.clone(),
			source,
		})?;
		self.data.insert(key, value);
		Ok(())
	}

	/// Get a raw JSON value
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.data.get(key)
	}

	/// Get and deserialize a value
	///
	/// Returns `Ok(None)` when the key is absent.
	///
	/// # Errors
	///
	/// Returns [`HttpError::SessionValue`] when the stored value does not
	/// deserialize into `T`.
	pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
		self.data
			.get(key)
			.map(|value| {
				T::deserialize(value).map_err(|source| HttpError::SessionValue {
					key: key.to_string(),
					source,
				})
			})
			.transpose()
	}

	/// Remove a value from the session
	pub fn remove(&mut self, key: &str) -> Option<Value> {
		self.data.shift_remove(key)
	}

	/// Returns true if the key is stored
	pub fn contains_key(&self, key: &str) -> bool {
		self.data.contains_key(key)
	}

	/// Number of stored keys
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Check if session is empty
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Clear all session data
	pub fn clear(&mut self) {
		self.data.clear();
	}

	/// Iterate over stored keys
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.data.keys().map(String::as_str)
	}
}

/// A session handle shared between the request and whoever persists it
///
/// Cloning the handle does not copy the data: every clone sees the same
/// session, so a middleware can save it once the datagrid has run.
///
/// # Examples
///
/// ```
/// use datagrid_http::SharedSession;
/// use serde_json::json;
///
/// let session = SharedSession::new();
/// let handle = session.clone();
/// handle.set("key", json!("value"));
/// assert_eq!(session.get("key"), Some(json!("value")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
	inner: Arc<Mutex<Session>>,
}

impl SharedSession {
	/// Create a handle around an empty session
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a handle around existing session data
	pub fn from_session(session: Session) -> Self {
		Self {
			inner: Arc::new(Mutex::new(session)),
		}
	}

	/// Clone out a raw value
	pub fn get(&self, key: &str) -> Option<Value> {
		self.inner.lock().get(key).cloned()
	}

	/// Deserialize a stored value, see [`Session::get_as`]
	pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
		self.inner.lock().get_as(key)
	}

	/// Store a raw value
	pub fn set(&self, key: impl Into<String>, value: Value) {
		self.inner.lock().set(key, value);
	}

	/// Serialize and store a value, see [`Session::set_as`]
	pub fn set_as<T: Serialize + ?Sized>(&self, key: impl Into<String>, value: &T) -> Result<()> {
		self.inner.lock().set_as(key, value)
	}

	/// Remove a value
	pub fn remove(&self, key: &str) -> Option<Value> {
		self.inner.lock().remove(key)
	}

	/// Returns true if the key is stored
	pub fn contains_key(&self, key: &str) -> bool {
		self.inner.lock().contains_key(key)
	}

	/// Copy of the current session data, typically handed to a [`SessionStore`]
	pub fn snapshot(&self) -> Session {
		self.inner.lock().clone()
	}

	/// Run a closure with mutable access to the session
	pub fn with<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
		f(&mut self.inner.lock())
	}
}

/// Persists sessions between requests, keyed by session id
///
/// A request works on a [`SharedSession`]; the surrounding application loads
/// it before the datagrid runs and saves its [`snapshot`](SharedSession::snapshot)
/// afterwards.
#[async_trait]
pub trait SessionStore: Send + Sync {
	/// Stored session, `None` for an unknown id
	async fn load(&self, session_id: &SessionId) -> Option<Session>;

	/// Store `session`, replacing whatever the id held
	async fn save(&self, session_id: &SessionId, session: &Session);

	/// Forget a session; returns whether the id was known
	async fn delete(&self, session_id: &SessionId) -> bool;

	/// Fresh random id (UUID v4)
	fn create_session_id(&self) -> SessionId {
		uuid::Uuid::new_v4().to_string()
	}
}

/// Session store kept in process memory
///
/// # Examples
///
/// ```
/// use datagrid_http::{InMemorySessionStore, Session, SessionStore};
/// use serde_json::json;
///
/// #[tokio::main]
/// async fn main() {
///     let store = InMemorySessionStore::new();
///     let visitor = store.create_session_id();
///
///     let mut grids = Session::new();
///     grids.set("datagrid.orders.param1", json!(2));
///     store.save(&visitor, &grids).await;
///
///     let restored = store.load(&visitor).await.unwrap_or_default();
///     assert_eq!(restored.get("datagrid.orders.param1"), Some(&json!(2)));
///     assert!(store.delete(&visitor).await);
/// }
/// ```
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
	sessions: tokio::sync::Mutex<HashMap<SessionId, Session>>,
}

impl InMemorySessionStore {
	/// Empty store
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
	async fn load(&self, session_id: &SessionId) -> Option<Session> {
		let sessions = self.sessions.lock().await;
		sessions.get(session_id).cloned()
	}

	async fn save(&self, session_id: &SessionId, session: &Session) {
		let mut sessions = self.sessions.lock().await;
		tracing::trace!(session_id = %session_id, keys = session.len(), "saving session");
		sessions.insert(session_id.clone(), session.clone());
	}

	async fn delete(&self, session_id: &SessionId) -> bool {
		self.sessions.lock().await.remove(session_id).is_some()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_session_preserves_insertion_order() {
		let mut session = Session::new();
		session.set("b", json!(1));
		session.set("a", json!(2));
		session.set("c", json!(3));

		let keys: Vec<&str> = session.keys().collect();
		assert_eq!(keys, vec!["b", "a", "c"]);
	}

	#[rstest]
	fn test_get_as_missing_key_is_none() {
		let session = Session::new();
		let value: Option<String> = session.get_as("missing").unwrap();
		assert!(value.is_none());
	}

	#[rstest]
	fn test_get_as_wrong_shape_is_error() {
		let mut session = Session::new();
		session.set("page", json!("not a number"));

		let result = session.get_as::<u64>("page");
		assert!(matches!(result, Err(HttpError::SessionValue { ref key, .. }) if key == "page"));
	}

	#[rstest]
	fn test_remove_returns_value() {
		let mut session = Session::new();
		session.set("key", json!("value"));
		assert_eq!(session.remove("key"), Some(json!("value")));
		assert!(session.is_empty());
	}

	#[rstest]
	fn test_shared_session_clones_share_state() {
		let session = SharedSession::new();
		let other = session.clone();

		other.set_as("columns", &["id", "name"]).unwrap();
		assert!(session.contains_key("columns"));

		session.remove("columns");
		assert!(!other.contains_key("columns"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_deleted_session_is_gone() {
		let store = InMemorySessionStore::new();
		let visitor = store.create_session_id();
		assert_ne!(visitor, store.create_session_id());

		let mut grids = Session::new();
		grids.set("datagrid.users.param1", json!(3));
		store.save(&visitor, &grids).await;
		assert_eq!(store.load(&visitor).await, Some(grids));

		assert!(store.delete(&visitor).await);
		assert!(!store.delete(&visitor).await);
		assert_eq!(store.load(&visitor).await, None);
	}
}
