//! Defines the endpoint that downloads the filtered ledger as CSV.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    auth::SessionScope,
    ledger::{
        entry::{DATE_FORMAT, LedgerEntry, sort_newest_first},
        filter::{EntryFilter, apply_filters},
    },
    store::LedgerStore,
};

/// The attachment header naming the downloaded file.
const CSV_CONTENT_DISPOSITION: &str = "attachment; filename=\"hey-bori-cashflow.csv\"";

/// The state needed to export the ledger.
#[derive(Debug, Clone)]
pub struct ExportState {
    /// The ledger file store.
    pub store: Arc<Mutex<LedgerStore>>,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// A route handler that serves the filtered ledger as a CSV attachment.
///
/// The same filters and scope override as listing apply, so a scoped caller
/// cannot export another program's rows. The payload is UTF-8 with a BOM so
/// spreadsheet applications detect the encoding.
pub async fn export_csv(
    State(state): State<ExportState>,
    Query(filter): Query<EntryFilter>,
    Extension(scope): Extension<SessionScope>,
) -> Result<Response, Error> {
    let ledger = state.store.lock().map_err(|_| Error::StoreLock)?.load();

    let mut entries = apply_filters(ledger.entries, &filter, &scope);
    sort_newest_first(&mut entries);

    let body = write_csv(&entries)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, CSV_CONTENT_DISPOSITION),
            (header::CACHE_CONTROL, "no-store"),
        ],
        body,
    )
        .into_response())
}

fn write_csv(entries: &[LedgerEntry]) -> Result<Vec<u8>, Error> {
    // UTF-8 BOM.
    let mut writer = csv::Writer::from_writer(vec![0xEF, 0xBB, 0xBF]);

    writer
        .write_record([
            "id",
            "date",
            "type",
            "amount",
            "category",
            "note",
            "team",
            "league",
            "program",
            "createdAt",
            "updatedAt",
        ])
        .map_err(|error| Error::CsvExport(error.to_string()))?;

    for entry in entries {
        let date = entry
            .date
            .format(DATE_FORMAT)
            .map_err(|error| Error::CsvExport(error.to_string()))?;

        let amount = entry.amount.to_string();
        let created_at = entry.created_at.to_string();
        let updated_at = entry.updated_at.to_string();

        writer
            .write_record([
                entry.id.as_str(),
                date.as_str(),
                entry.kind.as_str(),
                amount.as_str(),
                entry.category.as_str(),
                entry.note.as_str(),
                entry.team.as_str(),
                entry.league.as_str(),
                entry.program.as_str(),
                created_at.as_str(),
                updated_at.as_str(),
            ])
            .map_err(|error| Error::CsvExport(error.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::CsvExport(error.to_string()))
}
