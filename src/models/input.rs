use chrono::{Local, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

use super::Transaction;

/// Canonical storage format for `Transaction::date_time`.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Largest magnitude accepted for one transaction.
pub const MAX_AMOUNT: i64 = 10_000_000_000_000;

const DATE_TIME_INPUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Validated fields ready to become a stored transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub text: String,
    pub amount: Decimal,
    pub date_time: String,
}

/// Raw add-form input: a magnitude string plus a separate direction flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionInput {
    pub text: String,
    pub amount: String,
    pub is_expense: bool,
    pub date_time: String,
}

impl TransactionInput {
    pub fn new(
        text: impl Into<String>,
        amount: impl Into<String>,
        is_expense: bool,
        date_time: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            amount: amount.into(),
            is_expense,
            date_time: date_time.into(),
        }
    }

    /// Prefill from a stored transaction, splitting the sign back out.
    pub fn from_transaction(txn: &Transaction) -> Self {
        Self {
            text: txn.text.clone(),
            amount: txn.abs_amount().normalize().to_string(),
            is_expense: txn.is_expense(),
            date_time: txn.date_time.clone(),
        }
    }

    /// Returns `None` when the text is blank, the amount is zero, not a
    /// number or above [`MAX_AMOUNT`], or the timestamp cannot be read.
    pub fn validate(&self) -> Option<Entry> {
        let text = clean_text(&self.text)?;
        let magnitude = parse_magnitude(&self.amount)?;
        let date_time = normalize_date_time(&self.date_time)?;
        Some(Entry {
            text,
            amount: signed(magnitude, self.is_expense),
            date_time,
        })
    }
}

/// Partial update for an existing transaction. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionPatch {
    pub text: Option<String>,
    pub amount: Option<String>,
    pub is_expense: Option<bool>,
    pub date_time: Option<String>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.amount.is_none()
            && self.is_expense.is_none()
            && self.date_time.is_none()
    }

    /// Merge the patch over `current`, re-validating every replaced field.
    pub fn apply(&self, current: &Transaction) -> Option<Entry> {
        let text = match &self.text {
            Some(t) => clean_text(t)?,
            None => current.text.clone(),
        };
        let magnitude = match &self.amount {
            Some(a) => parse_magnitude(a)?,
            None => current.abs_amount(),
        };
        if magnitude.is_zero() {
            return None;
        }
        let is_expense = self.is_expense.unwrap_or_else(|| current.is_expense());
        let date_time = match &self.date_time {
            Some(d) => normalize_date_time(d)?,
            None => current.date_time.clone(),
        };
        Some(Entry {
            text,
            amount: signed(magnitude, is_expense),
            date_time,
        })
    }
}

fn clean_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_magnitude(amount: &str) -> Option<Decimal> {
    let magnitude = parse_amount(amount)?.abs();
    (!magnitude.is_zero() && magnitude <= Decimal::from(MAX_AMOUNT)).then_some(magnitude)
}

fn signed(magnitude: Decimal, is_expense: bool) -> Decimal {
    if is_expense {
        -magnitude
    } else {
        magnitude
    }
}

/// Parse a user-typed number. Accepts plain (`20.50`) and scientific (`2.05e1`)
/// notation.
pub fn parse_amount(input: &str) -> Option<Decimal> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Read a typed or persisted timestamp.
///
/// A trailing `Z` is ignored: stored timestamps are local wall-clock time.
/// A bare date means midnight.
pub fn parse_date_time(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();
    let s = s.strip_suffix('Z').unwrap_or(s);
    DATE_TIME_INPUTS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Normalize a timestamp to `DATE_TIME_FORMAT`.
pub fn normalize_date_time(input: &str) -> Option<String> {
    parse_date_time(input).map(|dt| dt.format(DATE_TIME_FORMAT).to_string())
}

/// Current local time in `DATE_TIME_FORMAT`.
pub fn now_date_time() -> String {
    Local::now().naive_local().format(DATE_TIME_FORMAT).to_string()
}
