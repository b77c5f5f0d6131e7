//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use crate::{auth::AuthMode, store::LedgerStore};

/// The state of the REST server.
///
/// The credential table is immutable after startup and freely shared; the
/// ledger store sits behind a mutex so concurrent writers cannot interleave
/// their whole-file read-modify-write cycles.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The credential table and mode built once from configuration.
    pub auth_mode: Arc<AuthMode>,

    /// The ledger file store.
    pub store: Arc<Mutex<LedgerStore>>,
}

impl AppState {
    /// Create a new [AppState] from the startup credential mode and an open
    /// ledger store.
    pub fn new(auth_mode: AuthMode, store: LedgerStore) -> Self {
        Self {
            auth_mode: Arc::new(auth_mode),
            store: Arc::new(Mutex::new(store)),
        }
    }
}
