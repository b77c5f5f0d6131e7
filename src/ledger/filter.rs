//! Applies team/league/program/date-range constraints to the ledger, with
//! the session's program scope forced over any client-supplied program
//! filter.

use serde::Deserialize;
use time::Date;

use crate::{
    auth::SessionScope,
    ledger::entry::{LedgerEntry, parse_iso_date},
};

/// The optional filter dimensions accepted by list, summary, and export.
///
/// All dimensions combine with logical AND. Matches on `team`, `league`, and
/// `program` are exact and case-sensitive. `from`/`to` bound the entry date
/// inclusively on both ends; a value that does not parse as `YYYY-MM-DD` is
/// treated as no bound at all (reads stay permissive — only writes reject
/// bad dates).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryFilter {
    /// Keep only entries of this team.
    pub team: Option<String>,
    /// Keep only entries of this league.
    pub league: Option<String>,
    /// Keep only entries of this program. Ignored when the session scope
    /// names a program.
    pub program: Option<String>,
    /// Keep only entries dated on or after this `YYYY-MM-DD` date.
    pub from: Option<String>,
    /// Keep only entries dated on or before this `YYYY-MM-DD` date.
    pub to: Option<String>,
}

/// Apply `filter` to `entries` under the authority of `scope`.
///
/// When `scope.program` is set it replaces any client-supplied program
/// filter before anything is matched: a scoped caller cannot widen its view
/// to another program's rows by naming one in the query string.
pub fn apply_filters(
    mut entries: Vec<LedgerEntry>,
    filter: &EntryFilter,
    scope: &SessionScope,
) -> Vec<LedgerEntry> {
    let program = scope
        .program
        .as_deref()
        .or_else(|| non_blank(&filter.program));
    let team = non_blank(&filter.team);
    let league = non_blank(&filter.league);
    let from = non_blank(&filter.from).and_then(parse_iso_date);
    let to = non_blank(&filter.to).and_then(parse_iso_date);

    entries.retain(|entry| matches(entry, team, league, program, from, to));
    entries
}

fn matches(
    entry: &LedgerEntry,
    team: Option<&str>,
    league: Option<&str>,
    program: Option<&str>,
    from: Option<Date>,
    to: Option<Date>,
) -> bool {
    if team.is_some_and(|team| entry.team != team) {
        return false;
    }
    if league.is_some_and(|league| entry.league != league) {
        return false;
    }
    if program.is_some_and(|program| entry.program != program) {
        return false;
    }
    if from.is_some_and(|from| entry.date < from) {
        return false;
    }
    if to.is_some_and(|to| entry.date > to) {
        return false;
    }

    true
}

/// Blank query parameters mean "no filter", matching how the original UI
/// submits empty form fields.
fn non_blank(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        auth::SessionScope,
        ledger::{
            entry::{EntryKind, LedgerEntry},
            filter::{EntryFilter, apply_filters},
        },
    };

    fn entry(program: &str, team: &str, league: &str, date: time::Date) -> LedgerEntry {
        LedgerEntry {
            id: format!("{program}-{team}-{league}-{date}"),
            kind: EntryKind::Income,
            amount: 10.0,
            category: "dues".to_owned(),
            note: String::new(),
            date,
            team: team.to_owned(),
            league: league.to_owned(),
            program: program.to_owned(),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn sample_entries() -> Vec<LedgerEntry> {
        vec![
            entry("Alpha", "U12", "LBJP", date!(2026 - 08 - 01)),
            entry("Alpha", "U14", "LBJP", date!(2026 - 08 - 02)),
            entry("Beta", "U12", "Metro", date!(2026 - 08 - 03)),
            entry("", "U12", "", date!(2026 - 08 - 04)),
        ]
    }

    #[test]
    fn no_filters_and_no_scope_returns_everything() {
        let got = apply_filters(
            sample_entries(),
            &EntryFilter::default(),
            &SessionScope::unrestricted(),
        );

        assert_eq!(got.len(), 4);
    }

    #[test]
    fn scope_overrides_a_client_program_filter_naming_another_program() {
        let filter = EntryFilter {
            program: Some("Beta".to_owned()),
            ..Default::default()
        };

        let got = apply_filters(sample_entries(), &filter, &SessionScope::for_program("Alpha"));

        assert_eq!(got.len(), 2);
        assert!(got.iter().all(|entry| entry.program == "Alpha"));
    }

    #[test]
    fn unscoped_sessions_may_filter_by_any_program() {
        let filter = EntryFilter {
            program: Some("Beta".to_owned()),
            ..Default::default()
        };

        let got = apply_filters(sample_entries(), &filter, &SessionScope::unrestricted());

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].program, "Beta");
    }

    #[test]
    fn team_and_league_filters_combine_with_and() {
        let filter = EntryFilter {
            team: Some("U12".to_owned()),
            league: Some("LBJP".to_owned()),
            ..Default::default()
        };

        let got = apply_filters(sample_entries(), &filter, &SessionScope::unrestricted());

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].team, "U12");
        assert_eq!(got[0].league, "LBJP");
    }

    #[test]
    fn team_matching_is_case_sensitive() {
        let filter = EntryFilter {
            team: Some("u12".to_owned()),
            ..Default::default()
        };

        let got = apply_filters(sample_entries(), &filter, &SessionScope::unrestricted());

        assert!(got.is_empty());
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let filter = EntryFilter {
            from: Some("2026-08-02".to_owned()),
            to: Some("2026-08-03".to_owned()),
            ..Default::default()
        };

        let got = apply_filters(sample_entries(), &filter, &SessionScope::unrestricted());

        assert_eq!(got.len(), 2);
        assert!(got.iter().all(|entry| {
            entry.date >= date!(2026 - 08 - 02) && entry.date <= date!(2026 - 08 - 03)
        }));
    }

    #[test]
    fn unparseable_date_bounds_are_treated_as_unbounded() {
        let filter = EntryFilter {
            from: Some("yesterday-ish".to_owned()),
            to: Some("2026-99-99".to_owned()),
            ..Default::default()
        };

        let got = apply_filters(sample_entries(), &filter, &SessionScope::unrestricted());

        assert_eq!(got.len(), 4);
    }

    #[test]
    fn blank_filter_values_match_everything() {
        let filter = EntryFilter {
            team: Some("  ".to_owned()),
            program: Some(String::new()),
            ..Default::default()
        };

        let got = apply_filters(sample_entries(), &filter, &SessionScope::unrestricted());

        assert_eq!(got.len(), 4);
    }
}
