//! Cash Flow is a small ledger web app for youth sports programs: income and
//! expense entries with team, league, and program labels, trailing-window
//! summaries, and CSV export.
//!
//! This library provides a JSON REST API over a whole-file JSON store.
//! Access control is PIN-based: the server can run open, behind one shared
//! PIN, or with one PIN per program, in which case every caller is scoped to
//! the single program its PIN is bound to.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod auth;
pub mod endpoints;
mod error;
mod ledger;
mod logging;
mod routing;
mod state;
mod store;
#[cfg(test)]
mod test_utils;

pub use auth::{AuthMode, pin_digest};
pub use error::Error;
pub use ledger::{EntryKind, LedgerEntry};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use state::AppState;
pub use store::{LedgerFile, LedgerStore};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
