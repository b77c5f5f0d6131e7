//! Defines the endpoint for deleting a ledger entry by its ID.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
};
use serde::Serialize;

use crate::{AppState, Error, auth::SessionScope, store::LedgerStore};

/// The state needed to delete a ledger entry.
#[derive(Debug, Clone)]
pub struct DeleteEntryState {
    /// The ledger file store.
    pub store: Arc<Mutex<LedgerStore>>,
}

impl FromRef<AppState> for DeleteEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// The successful delete response.
#[derive(Debug, Serialize)]
pub struct DeleteEntryResponse {
    /// Always `true`.
    pub ok: bool,
    /// The ID of the entry that was removed.
    pub id: String,
}

/// A route handler for deleting a single ledger entry.
///
/// A session scoped to a program can only delete that program's rows; an ID
/// belonging to another program answers the same 404 as an ID that does not
/// exist, so foreign rows are not observable through this endpoint.
///
/// # Errors
/// Answers 404 [Error::EntryNotFound] when no visible entry has the ID and
/// 500 when the ledger file cannot be written.
pub async fn delete_entry(
    State(state): State<DeleteEntryState>,
    Extension(scope): Extension<SessionScope>,
    Path(entry_id): Path<String>,
) -> Result<Json<DeleteEntryResponse>, Error> {
    let store = state.store.lock().map_err(|_| Error::StoreLock)?;
    let mut ledger = store.load();

    let position = ledger
        .entries
        .iter()
        .position(|entry| {
            entry.id == entry_id
                && scope
                    .program
                    .as_deref()
                    .is_none_or(|program| entry.program == program)
        })
        .ok_or(Error::EntryNotFound)?;

    let entry = ledger.entries.remove(position);
    store.save(&ledger)?;

    tracing::debug!("deleted entry {} from {:?}", entry.id, entry.program);

    Ok(Json(DeleteEntryResponse { ok: true, id: entry.id }))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use crate::{
        auth::{X_AUTH_HEADER, pin_digest},
        endpoints::{self, format_endpoint},
        test_utils::{multi_pin_app, open_app, seed_entry},
    };

    #[tokio::test]
    async fn delete_removes_the_entry() {
        let app = open_app();
        let id = seed_entry(&app.state, "Alpha", "U12", "LBJP", "2026-08-01", 10.0);

        let response = app
            .server
            .delete(&format_endpoint(endpoints::LEDGER_ENTRY, &id))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["ok"], json!(true));
        assert_eq!(body["id"], json!(id));

        let ledger = app.state.store.lock().unwrap().load();
        assert!(ledger.entries.is_empty());
    }

    #[tokio::test]
    async fn deleting_an_unknown_id_answers_not_found() {
        let app = open_app();

        let response = app
            .server
            .delete(&format_endpoint(endpoints::LEDGER_ENTRY, "no-such-id"))
            .await;

        response.assert_status_not_found();
        let body: Value = response.json();
        assert_eq!(body["error"], json!("entry not found"));
    }

    #[tokio::test]
    async fn scoped_session_cannot_delete_another_programs_entry() {
        let app = multi_pin_app();
        let foreign_id = seed_entry(&app.state, "Beta", "U12", "Metro", "2026-08-01", 10.0);

        let response = app
            .server
            .delete(&format_endpoint(endpoints::LEDGER_ENTRY, &foreign_id))
            .add_header(X_AUTH_HEADER, pin_digest("1111"))
            .await;

        response.assert_status_not_found();

        let ledger = app.state.store.lock().unwrap().load();
        assert_eq!(ledger.entries.len(), 1, "the foreign entry must survive");
    }

    #[tokio::test]
    async fn scoped_session_can_delete_its_own_entry() {
        let app = multi_pin_app();
        let own_id = seed_entry(&app.state, "Alpha", "U12", "LBJP", "2026-08-01", 10.0);

        let response = app
            .server
            .delete(&format_endpoint(endpoints::LEDGER_ENTRY, &own_id))
            .add_header(X_AUTH_HEADER, pin_digest("1111"))
            .await;

        response.assert_status_ok();

        let ledger = app.state.store.lock().unwrap().load();
        assert!(ledger.entries.is_empty());
    }
}
