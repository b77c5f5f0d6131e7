//! PIN-based authentication and program scoping.
//!
//! The credential table is built once at startup from configuration strings
//! and is immutable for the lifetime of the process. Every API call
//! re-validates the presented bearer token against it; the server keeps no
//! session table.

mod credentials;
mod log_in;
mod middleware;
mod session;

pub use credentials::{AuthMode, pin_digest};
pub use log_in::post_log_in;
pub use middleware::{X_AUTH_HEADER, auth_guard};
pub use session::{SessionScope, authenticate, get_session};

pub(crate) use middleware::AuthState;
