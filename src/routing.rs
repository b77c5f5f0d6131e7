//! Application router configuration with protected and unprotected route
//! definitions.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
};

use crate::{
    AppState,
    auth::{auth_guard, get_session, post_log_in},
    endpoints,
    ledger::{add_entry, delete_entry, export_csv, get_summary, list_entries},
};

/// Return a router with all the app's routes.
///
/// Every `/api/ledger/*` route sits behind the auth guard; the session,
/// login, and health routes do not, so clients can discover the credential
/// mode and obtain a token.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(endpoints::SESSION, get(get_session))
        .route(endpoints::LOG_IN, post(post_log_in));

    let protected_routes = Router::new()
        .route(endpoints::LEDGER_LIST, get(list_entries))
        .route(endpoints::LEDGER_SUMMARY, get(get_summary))
        .route(endpoints::LEDGER_EXPORT, get(export_csv))
        .route(endpoints::LEDGER_ADD, post(add_entry))
        .route(endpoints::LEDGER_ENTRY, delete(delete_entry))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    unprotected_routes
        .merge(protected_routes)
        .fallback(get_not_found)
        .with_state(state)
}

async fn get_health() -> &'static str {
    "OK"
}

async fn get_not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
