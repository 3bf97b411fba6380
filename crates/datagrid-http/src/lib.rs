//! HTTP plumbing for datagrids
//!
//! A datagrid reads its state from three places that a web framework
//! normally provides:
//!
//! - **Request**: the query string and url-encoded body of the current request
//! - **Session**: per-user key/value storage that survives between requests
//! - **Router**: named routes used to generate links back to the listing
//!
//! This crate provides small, framework-agnostic versions of each so a
//! datagrid can be driven from any server stack.
//!
//! # Example
//!
//! ```rust
//! use datagrid_http::{Request, SharedSession};
//! use hyper::Method;
//!
//! let session = SharedSession::new();
//! let request = Request::builder()
//!     .method(Method::GET)
//!     .uri("/users?action=sort&datagrid=users&param1=name&param2=desc")
//!     .session(session.clone())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(request.get("action"), Some("sort"));
//! assert_eq!(request.get("param2"), Some("desc"));
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod request;
pub mod router;
pub mod session;

pub use error::{HttpError, Result};
pub use request::{Request, RequestBuilder};
pub use router::{RouteParams, RouteTable, UrlGenerator, pattern_placeholders};
pub use session::{InMemorySessionStore, Session, SessionId, SessionStore, SharedSession};

// Re-exported so callers do not need a direct hyper dependency to build requests
pub use hyper::Method;
