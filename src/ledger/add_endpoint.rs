//! Defines the endpoint for recording a new ledger entry.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::SessionScope,
    ledger::entry::{AddEntryRequest, LedgerEntry},
    store::LedgerStore,
};

/// The state needed to record a ledger entry.
#[derive(Debug, Clone)]
pub struct AddEntryState {
    /// The ledger file store.
    pub store: Arc<Mutex<LedgerStore>>,
}

impl FromRef<AppState> for AddEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// The successful add response, echoing the stored entry.
#[derive(Debug, Serialize)]
pub struct AddEntryResponse {
    /// Always `true`.
    pub ok: bool,
    /// The entry as stored, including its generated ID and timestamps.
    pub entry: LedgerEntry,
}

/// A route handler for recording a new ledger entry.
///
/// The payload passes the explicit validation in
/// [AddEntryRequest::into_entry]; a session scoped to a program has that
/// program forced onto the entry no matter what the payload claims.
///
/// # Errors
/// Answers 400 with a specific message when validation fails and 500 when
/// the ledger file cannot be written.
pub async fn add_entry(
    State(state): State<AddEntryState>,
    Extension(scope): Extension<SessionScope>,
    Json(payload): Json<AddEntryRequest>,
) -> Result<Json<AddEntryResponse>, Error> {
    let today = OffsetDateTime::now_utc().date();
    let entry = payload.into_entry(scope.program.as_deref(), today)?;

    let store = state.store.lock().map_err(|_| Error::StoreLock)?;
    let mut ledger = store.load();
    ledger.entries.insert(0, entry.clone());
    store.save(&ledger)?;

    tracing::debug!("recorded {} entry {} for {:?}", entry.kind.as_str(), entry.id, entry.program);

    Ok(Json(AddEntryResponse { ok: true, entry }))
}
