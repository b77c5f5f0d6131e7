//! Shared helpers for endpoint tests.

use std::sync::atomic::{AtomicI64, Ordering};

use axum_test::TestServer;
use tempfile::TempDir;
use uuid::Uuid;

use crate::{
    AppState, LedgerStore,
    auth::AuthMode,
    ledger::{EntryKind, LedgerEntry},
    routing::build_router,
};

/// A test server wired to a fresh ledger file in a temporary directory.
pub(crate) struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    // Held so the ledger file outlives the test server.
    _data_dir: TempDir,
}

/// Build a [TestApp] running in the given credential mode.
pub(crate) fn test_app(auth_mode: AuthMode) -> TestApp {
    let data_dir = tempfile::tempdir().expect("Could not create temp dir");
    let store = LedgerStore::open(data_dir.path().join("ledger.json"))
        .expect("Could not open the test ledger store");
    let state = AppState::new(auth_mode, store);
    let server = TestServer::new(build_router(state.clone()));

    TestApp {
        server,
        state,
        _data_dir: data_dir,
    }
}

/// A [TestApp] with no credential configuration.
pub(crate) fn open_app() -> TestApp {
    test_app(AuthMode::Open)
}

/// A [TestApp] configured with the PINs 1111 (Alpha) and 2222 (Beta).
pub(crate) fn multi_pin_app() -> TestApp {
    test_app(AuthMode::from_config(Some("1111:Alpha,2222:Beta"), None))
}

static NEXT_CREATED_AT: AtomicI64 = AtomicI64::new(1);

/// Insert an income entry directly into the store, returning its ID.
///
/// Each seeded entry gets a strictly increasing `createdAt` so ordering
/// tests are deterministic.
pub(crate) fn seed_entry(
    state: &AppState,
    program: &str,
    team: &str,
    league: &str,
    date: &str,
    amount: f64,
) -> String {
    let created_at = NEXT_CREATED_AT.fetch_add(1, Ordering::Relaxed);
    let entry = LedgerEntry {
        id: Uuid::new_v4().to_string(),
        kind: EntryKind::Income,
        amount,
        category: "dues".to_owned(),
        note: String::new(),
        date: crate::ledger::parse_iso_date(date).expect("seed dates must be YYYY-MM-DD"),
        team: team.to_owned(),
        league: league.to_owned(),
        program: program.to_owned(),
        created_at,
        updated_at: created_at,
    };
    let id = entry.id.clone();

    let store = state.store.lock().unwrap();
    let mut ledger = store.load();
    ledger.entries.insert(0, entry);
    store.save(&ledger).expect("Could not seed the test ledger");

    id
}
