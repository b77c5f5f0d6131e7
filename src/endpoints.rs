//! Defines the routes that the server will serve content on.
//!
//! For endpoints that take a parameter, e.g., '/api/ledger/{entry_id}', use
//! [format_endpoint].

/// Liveness probe, answers plain text "OK".
pub const HEALTH: &str = "/health";
/// Reports the credential mode and the caller's resolved program scope.
pub const SESSION: &str = "/api/session";
/// Exchanges a raw PIN for a bearer token.
pub const LOG_IN: &str = "/api/login";
/// Lists ledger entries, newest first.
pub const LEDGER_LIST: &str = "/api/ledger/list";
/// Aggregates ledger entries over a trailing window of days.
pub const LEDGER_SUMMARY: &str = "/api/ledger/summary";
/// Downloads the filtered ledger as a CSV attachment.
pub const LEDGER_EXPORT: &str = "/api/ledger/export.csv";
/// Creates a new ledger entry.
pub const LEDGER_ADD: &str = "/api/ledger/add";
/// Deletes a single ledger entry by its ID.
pub const LEDGER_ENTRY: &str = "/api/ledger/{entry_id}";

/// Create a concrete URL from an endpoint path containing a `{parameter}`.
///
/// Returns the path unchanged if it contains no parameter.
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    let param_start = match endpoint_path.find('{') {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = match endpoint_path[param_start..].find('}') {
        Some(end) => param_start + end + 1,
        None => return endpoint_path.to_string(),
    };

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

#[cfg(test)]
mod tests {
    use super::{LEDGER_ENTRY, format_endpoint};

    #[test]
    fn format_endpoint_replaces_parameter() {
        let got = format_endpoint(LEDGER_ENTRY, "abc-123");

        assert_eq!(got, "/api/ledger/abc-123");
    }

    #[test]
    fn format_endpoint_returns_plain_paths_unchanged() {
        let got = format_endpoint("/api/ledger/list", "abc-123");

        assert_eq!(got, "/api/ledger/list");
    }
}
