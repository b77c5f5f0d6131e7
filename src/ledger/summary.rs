//! Aggregates ledger entries over a trailing window of days.
//!
//! A single linear pass accumulates running income/expense sums plus
//! per-category, per-team-and-league, and per-program sub-totals. Sums are
//! accumulated at full f64 precision and only rounded to cents at the output
//! boundary so long ledgers do not accumulate rounding drift.

use std::collections::BTreeMap;

use serde::Serialize;
use time::{Date, Duration};

use crate::{
    auth::SessionScope,
    ledger::{
        entry::{EntryKind, LedgerEntry, UNCATEGORIZED, round_to_cents},
        filter::{EntryFilter, apply_filters},
    },
};

/// The program bucket used for entries that belong to no program.
pub const NO_PROGRAM: &str = "(no program)";

/// The window used when the caller does not name one.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;
/// The longest window a caller may request.
pub const MAX_WINDOW_DAYS: i64 = 365;

/// Clamp a requested window length into `[1, 365]`, defaulting to 30.
pub fn clamp_window_days(days: Option<i64>) -> i64 {
    days.unwrap_or(DEFAULT_WINDOW_DAYS).clamp(1, MAX_WINDOW_DAYS)
}

/// Income and expense sub-totals for one aggregation bucket.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct BucketTotals {
    /// Total income in this bucket, rounded to cents.
    pub income: f64,
    /// Total expense in this bucket, rounded to cents.
    pub expense: f64,
}

/// The overall totals for the window.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Totals {
    /// Total income, rounded to cents.
    pub income: f64,
    /// Total expense, rounded to cents.
    pub expense: f64,
    /// `income - expense`, rounded to cents.
    pub net: f64,
}

/// The aggregated view of a filtered ledger subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// The (clamped) window length that was aggregated.
    pub range_days: i64,
    /// Overall income/expense/net.
    pub totals: Totals,
    /// Sub-totals keyed by category.
    pub by_category: BTreeMap<String, BucketTotals>,
    /// Sub-totals keyed by `"<team> | <league>"`, with `-` placeholders.
    pub by_team_league: BTreeMap<String, BucketTotals>,
    /// Sub-totals keyed by program, with a [NO_PROGRAM] bucket.
    pub by_program: BTreeMap<String, BucketTotals>,
    /// How many entries contributed to the totals.
    pub count: usize,
}

/// Aggregate `entries` over the trailing `days`-day window ending at `today`.
///
/// The window keeps entries dated on or after `today - days`, so an entry
/// dated exactly `days` ago is included and one dated a day earlier is not.
/// `filter` and `scope` are applied with the same program-override rule as
/// listing (see [apply_filters]).
pub fn summarize(
    entries: Vec<LedgerEntry>,
    days: i64,
    filter: &EntryFilter,
    scope: &SessionScope,
    today: Date,
) -> Summary {
    let cutoff = today - Duration::days(days);

    let mut within: Vec<LedgerEntry> = entries
        .into_iter()
        .filter(|entry| entry.date >= cutoff)
        .collect();
    within = apply_filters(within, filter, scope);

    let mut income = 0.0_f64;
    let mut expense = 0.0_f64;
    let mut by_category: BTreeMap<String, RawBucket> = BTreeMap::new();
    let mut by_team_league: BTreeMap<String, RawBucket> = BTreeMap::new();
    let mut by_program: BTreeMap<String, RawBucket> = BTreeMap::new();

    for entry in &within {
        match entry.kind {
            EntryKind::Income => income += entry.amount,
            EntryKind::Expense => expense += entry.amount,
        }

        let category = if entry.category.is_empty() {
            UNCATEGORIZED
        } else {
            entry.category.as_str()
        };
        by_category
            .entry(category.to_owned())
            .or_default()
            .add(entry);

        by_team_league
            .entry(team_league_key(entry))
            .or_default()
            .add(entry);

        let program = if entry.program.is_empty() {
            NO_PROGRAM
        } else {
            entry.program.as_str()
        };
        by_program.entry(program.to_owned()).or_default().add(entry);
    }

    Summary {
        range_days: days,
        totals: Totals {
            income: round_to_cents(income),
            expense: round_to_cents(expense),
            net: round_to_cents(income - expense),
        },
        by_category: round_buckets(by_category),
        by_team_league: round_buckets(by_team_league),
        by_program: round_buckets(by_program),
        count: within.len(),
    }
}

/// The composite `"<team> | <league>"` bucket key, with a literal dash
/// standing in for a missing team or league.
fn team_league_key(entry: &LedgerEntry) -> String {
    let team = if entry.team.is_empty() {
        "-"
    } else {
        entry.team.as_str()
    };
    let league = if entry.league.is_empty() {
        "-"
    } else {
        entry.league.as_str()
    };

    format!("{team} | {league}")
}

/// Unrounded accumulator for one bucket.
#[derive(Debug, Default)]
struct RawBucket {
    income: f64,
    expense: f64,
}

impl RawBucket {
    fn add(&mut self, entry: &LedgerEntry) {
        match entry.kind {
            EntryKind::Income => self.income += entry.amount,
            EntryKind::Expense => self.expense += entry.amount,
        }
    }
}

fn round_buckets(buckets: BTreeMap<String, RawBucket>) -> BTreeMap<String, BucketTotals> {
    buckets
        .into_iter()
        .map(|(key, bucket)| {
            (
                key,
                BucketTotals {
                    income: round_to_cents(bucket.income),
                    expense: round_to_cents(bucket.expense),
                },
            )
        })
        .collect()
}
