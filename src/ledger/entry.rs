//! Defines the core ledger entry model and the validation of add payloads.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};
use uuid::Uuid;

use crate::Error;

/// The category recorded when an entry is added with a blank category, so
/// aggregation buckets stay well-defined.
pub const UNCATEGORIZED: &str = "(uncategorized)";

/// The calendar date format used on the wire and in the CSV export.
pub(crate) const DATE_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` string into a [Date], or `None` if it is not one.
pub(crate) fn parse_iso_date(text: &str) -> Option<Date> {
    Date::parse(text.trim(), DATE_FORMAT).ok()
}

/// Whether an entry records money coming in or going out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Money earned, e.g. dues, sponsorship.
    Income,
    /// Money spent, e.g. uniforms, travel.
    Expense,
}

impl EntryKind {
    /// The lowercase wire name, as used in JSON and the CSV export.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        }
    }
}

/// A single income or expense recorded in the ledger.
///
/// Entries are immutable once created; the only mutation the ledger supports
/// is delete-by-ID. The canonical list order is `(date desc, createdAt desc)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    /// The unique ID of the entry.
    pub id: String,
    /// Whether this is income or an expense.
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// The amount in dollars, always rounded to cents.
    pub amount: f64,
    /// What the money was for, e.g. "dues", "uniforms".
    pub category: String,
    /// Free-form text detail.
    pub note: String,
    /// The calendar date the money moved.
    pub date: Date,
    /// The team this entry belongs to, or empty.
    pub team: String,
    /// The league this entry belongs to, or empty.
    pub league: String,
    /// The program this entry belongs to, or empty.
    pub program: String,
    /// When the entry was recorded, as unix milliseconds.
    pub created_at: i64,
    /// When the entry was last written, as unix milliseconds.
    pub updated_at: i64,
}

/// Sort entries into the canonical newest-first order.
pub fn sort_newest_first(entries: &mut [LedgerEntry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
}

/// Round a dollar amount to whole cents.
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// The loosely-typed add payload as received on the wire.
///
/// Every field is optional at the serde layer; [AddEntryRequest::into_entry]
/// is the explicit parse-and-validate step that either produces a fully
/// constrained [LedgerEntry] or rejects the payload with a specific error.
#[derive(Debug, Default, Deserialize)]
pub struct AddEntryRequest {
    /// "income" or "expense" (case-insensitive).
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// A positive dollar amount, as a JSON number or a numeric string.
    #[serde(default)]
    pub amount: Option<serde_json::Value>,
    /// The category; blank becomes [UNCATEGORIZED].
    #[serde(default)]
    pub category: Option<String>,
    /// Free-form note.
    #[serde(default)]
    pub note: Option<String>,
    /// The entry date as `YYYY-MM-DD`; absent means today.
    #[serde(default)]
    pub date: Option<String>,
    /// The team name.
    #[serde(default)]
    pub team: Option<String>,
    /// The league name.
    #[serde(default)]
    pub league: Option<String>,
    /// The program name; ignored when the session carries a program scope.
    #[serde(default)]
    pub program: Option<String>,
}

impl AddEntryRequest {
    /// Validate the payload into a [LedgerEntry].
    ///
    /// When `program_scope` is set it replaces whatever `program` the payload
    /// carried; a scoped caller cannot write into another program's ledger.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidEntryKind] if `type` is not "income" or "expense",
    /// - or [Error::InvalidAmount] if `amount` is missing, non-numeric, not
    ///   finite, or rounds below one cent,
    /// - or [Error::InvalidDate] if `date` is present but not `YYYY-MM-DD`.
    pub fn into_entry(
        self,
        program_scope: Option<&str>,
        today: Date,
    ) -> Result<LedgerEntry, Error> {
        let kind = match self
            .kind
            .as_deref()
            .map(|kind| kind.trim().to_lowercase())
            .as_deref()
        {
            Some("income") => EntryKind::Income,
            Some("expense") => EntryKind::Expense,
            _ => return Err(Error::InvalidEntryKind),
        };

        let amount = parse_amount(self.amount.as_ref()).ok_or(Error::InvalidAmount)?;

        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => today,
            Some(text) => parse_iso_date(text).ok_or_else(|| Error::InvalidDate(text.to_owned()))?,
        };

        let program = match program_scope {
            Some(program) => program.to_owned(),
            None => trimmed_or_empty(self.program),
        };

        let category = trimmed_or_empty(self.category);
        let now_ms = unix_timestamp_ms();

        Ok(LedgerEntry {
            id: Uuid::new_v4().to_string(),
            kind,
            amount,
            category: if category.is_empty() {
                UNCATEGORIZED.to_owned()
            } else {
                category
            },
            note: trimmed_or_empty(self.note),
            date,
            team: trimmed_or_empty(self.team),
            league: trimmed_or_empty(self.league),
            program,
            created_at: now_ms,
            updated_at: now_ms,
        })
    }
}

/// Coerce the wire amount into a rounded, positive number of dollars.
///
/// Accepts a JSON number or a string that parses as one. Anything else, and
/// any value that is not finite or rounds below one cent, is `None`.
fn parse_amount(value: Option<&serde_json::Value>) -> Option<f64> {
    let amount = match value {
        Some(serde_json::Value::Number(number)) => number.as_f64()?,
        Some(serde_json::Value::String(text)) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if !amount.is_finite() {
        return None;
    }

    let rounded = round_to_cents(amount);
    (rounded >= 0.01).then_some(rounded)
}

fn trimmed_or_empty(field: Option<String>) -> String {
    field.map(|text| text.trim().to_owned()).unwrap_or_default()
}

fn unix_timestamp_ms() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
