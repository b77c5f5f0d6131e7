//! Defines the app level error type and its conversion to wire-format JSON
//! responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A protected endpoint was called without a valid bearer token.
    #[error("auth required")]
    AuthRequired,

    /// The PIN submitted at login did not match any configured credential.
    #[error("invalid pin")]
    InvalidPin,

    /// The entry type was not "income" or "expense".
    #[error("type must be income or expense")]
    InvalidEntryKind,

    /// The entry amount was missing, not a number, or not positive.
    #[error("amount must be a positive number")]
    InvalidAmount,

    /// The entry date could not be parsed as a calendar date.
    ///
    /// Dates in add payloads must be `YYYY-MM-DD`. Unlike date *filters*,
    /// which fall back to an unbounded range, a bad date on a write is
    /// rejected so it cannot corrupt the ledger.
    #[error("\"{0}\" is not a valid date, expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The entry ID did not match any entry visible to the caller's scope.
    #[error("entry not found")]
    EntryNotFound,

    /// Could not acquire the ledger store lock.
    #[error("could not acquire the ledger store lock")]
    StoreLock,

    /// The ledger file could not be written.
    ///
    /// The error string should only be logged for debugging on the server.
    /// Clients receive a general internal server error instead.
    #[error("could not write the ledger file: {0}")]
    StoreWrite(String),

    /// The CSV export could not be serialized.
    #[error("could not serialize the CSV export: {0}")]
    CsvExport(String),
}

/// The `{ok: false, error}` envelope that every failed call answers with.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Always `false`.
    pub ok: bool,
    /// A human-readable description of the failure.
    pub error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::AuthRequired => StatusCode::UNAUTHORIZED,
            Error::InvalidPin => StatusCode::FORBIDDEN,
            Error::InvalidEntryKind | Error::InvalidAmount | Error::InvalidDate(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::EntryNotFound => StatusCode::NOT_FOUND,
            Error::StoreLock | Error::StoreWrite(_) | Error::CsvExport(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Internal errors are not intended to be shown to the client.
        let error = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("an unexpected error occurred: {self}");
            "internal server error".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody { ok: false, error })).into_response()
    }
}
