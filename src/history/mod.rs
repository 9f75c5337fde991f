//! Day-grouped transaction history.

use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::models::{parse_date_time, Transaction};
use crate::summary::round_cents;

/// One calendar day of history, newest transaction first.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DayGroup<'a> {
    /// `YYYY-MM-DD`
    pub(crate) day: String,
    pub(crate) transactions: Vec<&'a Transaction>,
    /// Signed sum of the day's amounts, rounded to cents.
    pub(crate) total: Decimal,
}

impl DayGroup<'_> {
    /// Latest timestamp in the group, used for the header label.
    pub(crate) fn representative(&self) -> &str {
        self.transactions
            .first()
            .map_or(self.day.as_str(), |t| t.date_time.as_str())
    }
}

/// Stable sort by timestamp, newest first. Ties keep their input order.
pub(crate) fn sort_newest_first<'a, I>(transactions: I) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut sorted: Vec<&Transaction> = transactions.into_iter().collect();
    sorted.sort_by(|a, b| b.date_time.cmp(&a.date_time));
    sorted
}

pub(crate) fn group_by_day<'a, I>(transactions: I) -> Vec<DayGroup<'a>>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut groups: Vec<DayGroup<'a>> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for txn in sort_newest_first(transactions) {
        let day = txn.day_key();
        let slot = *index.entry(day).or_insert_with(|| {
            groups.push(DayGroup {
                day: day.to_string(),
                transactions: Vec::new(),
                total: Decimal::ZERO,
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.total = group.total.saturating_add(txn.amount);
        group.transactions.push(txn);
    }

    for group in &mut groups {
        group.total = round_cents(group.total);
    }
    groups.sort_by(|a, b| b.day.cmp(&a.day));
    groups
}

/// `"Mar 2"` for dates in `today`'s year, `"Mar 2, 2023"` otherwise.
/// Unreadable timestamps fall back to their day key.
pub(crate) fn format_day_label(date_time: &str, today: NaiveDate) -> String {
    let day = date_time.split_once('T').map_or(date_time, |(d, _)| d);
    let Some(dt) = parse_date_time(date_time).or_else(|| parse_date_time(day)) else {
        return day.to_string();
    };

    if dt.year() == today.year() {
        dt.format("%b %-d").to_string()
    } else {
        dt.format("%b %-d, %Y").to_string()
    }
}

/// Day label evaluated against the local clock.
pub(crate) fn day_label_now(date_time: &str) -> String {
    format_day_label(date_time, Local::now().date_naive())
}

/// 12-hour wall-clock time, e.g. `"9:05 PM"`.
pub(crate) fn format_time(date_time: &str) -> String {
    parse_date_time(date_time)
        .map(|dt| dt.format("%-I:%M %p").to_string())
        .unwrap_or_default()
}
