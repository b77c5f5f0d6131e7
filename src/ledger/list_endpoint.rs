//! Defines the endpoint for listing ledger entries.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State},
};
use serde::Serialize;

use crate::{
    AppState, Error,
    auth::SessionScope,
    ledger::{
        entry::{LedgerEntry, sort_newest_first},
        filter::{EntryFilter, apply_filters},
    },
    store::LedgerStore,
};

/// The state needed to list ledger entries.
#[derive(Debug, Clone)]
pub struct ListEntriesState {
    /// The ledger file store.
    pub store: Arc<Mutex<LedgerStore>>,
}

impl FromRef<AppState> for ListEntriesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// The successful list response.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    /// Always `true`.
    pub ok: bool,
    /// The matching entries, newest first.
    pub entries: Vec<LedgerEntry>,
}

/// A route handler for listing ledger entries, newest first.
///
/// Filters combine with AND; a session scoped to a program only ever sees
/// that program's rows, regardless of the `program` query parameter.
pub async fn list_entries(
    State(state): State<ListEntriesState>,
    Query(filter): Query<EntryFilter>,
    Extension(scope): Extension<SessionScope>,
) -> Result<Json<ListResponse>, Error> {
    let ledger = state.store.lock().map_err(|_| Error::StoreLock)?.load();

    let mut entries = apply_filters(ledger.entries, &filter, &scope);
    sort_newest_first(&mut entries);

    Ok(Json(ListResponse { ok: true, entries }))
}
