//! The ledger itself: the entry model, scope-aware filtering, trailing-window
//! aggregation, and the `/api/ledger/*` endpoints.

mod add_endpoint;
mod delete_endpoint;
mod entry;
mod export_endpoint;
mod filter;
mod list_endpoint;
mod summary;
mod summary_endpoint;

pub use add_endpoint::add_entry;
pub use delete_endpoint::delete_entry;
pub use entry::{
    AddEntryRequest, EntryKind, LedgerEntry, UNCATEGORIZED, round_to_cents, sort_newest_first,
};
pub use export_endpoint::export_csv;
pub use filter::{EntryFilter, apply_filters};
pub use list_endpoint::list_entries;
pub use summary::{
    BucketTotals, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS, NO_PROGRAM, Summary, Totals,
    clamp_window_days, summarize,
};
pub use summary_endpoint::get_summary;

#[cfg(test)]
pub(crate) use entry::parse_iso_date;
