//! Defines the endpoint for the trailing-window summary.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::SessionScope,
    ledger::{
        filter::EntryFilter,
        summary::{Summary, clamp_window_days, summarize},
    },
    store::LedgerStore,
};

/// The state needed to summarize the ledger.
#[derive(Debug, Clone)]
pub struct SummaryState {
    /// The ledger file store.
    pub store: Arc<Mutex<LedgerStore>>,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// The summary query string: a window length plus the shared filters.
///
/// `range` that does not parse as a whole number of days falls back to the
/// default window, mirroring the permissive treatment of date filters.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    /// The trailing window in days, clamped to `[1, 365]`, default 30.
    pub range: Option<String>,
    /// Keep only entries of this team.
    pub team: Option<String>,
    /// Keep only entries of this league.
    pub league: Option<String>,
    /// Keep only entries of this program (unless the session is scoped).
    pub program: Option<String>,
    /// Keep only entries dated on or after this date.
    pub from: Option<String>,
    /// Keep only entries dated on or before this date.
    pub to: Option<String>,
}

impl SummaryQuery {
    fn window_days(&self) -> i64 {
        clamp_window_days(
            self.range
                .as_deref()
                .and_then(|range| range.trim().parse().ok()),
        )
    }

    fn filter(&self) -> EntryFilter {
        EntryFilter {
            team: self.team.clone(),
            league: self.league.clone(),
            program: self.program.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
        }
    }
}

/// The successful summary response.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    /// Always `true`.
    pub ok: bool,
    /// The aggregated totals and buckets.
    #[serde(flatten)]
    pub summary: Summary,
}

/// A route handler for summarizing the ledger over a trailing window.
pub async fn get_summary(
    State(state): State<SummaryState>,
    Query(query): Query<SummaryQuery>,
    Extension(scope): Extension<SessionScope>,
) -> Result<Json<SummaryResponse>, Error> {
    let ledger = state.store.lock().map_err(|_| Error::StoreLock)?.load();
    let today = OffsetDateTime::now_utc().date();

    let summary = summarize(
        ledger.entries,
        query.window_days(),
        &query.filter(),
        &scope,
        today,
    );

    Ok(Json(SummaryResponse { ok: true, summary }))
}
