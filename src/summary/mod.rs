//! Income, expense and balance totals over a set of transactions.
//!
//! Everything here is a pure function of its inputs; callers decide when to
//! recompute.

use chrono::{Datelike, Local, Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Transaction;

/// Rounded totals. `expense` is reported as a positive magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Totals {
    pub(crate) balance: Decimal,
    pub(crate) income: Decimal,
    pub(crate) expense: Decimal,
}

impl Totals {
    pub(crate) fn balance_str(&self) -> String {
        format!("{:.2}", self.balance)
    }

    pub(crate) fn income_str(&self) -> String {
        format!("{:.2}", self.income)
    }

    pub(crate) fn expense_str(&self) -> String {
        format!("{:.2}", self.expense)
    }
}

/// Round half away from zero to two decimal places.
pub(crate) fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub(crate) fn aggregate<'a, I>(transactions: I) -> Totals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut income = Decimal::ZERO;
    let mut spent = Decimal::ZERO;
    for txn in transactions {
        if txn.amount > Decimal::ZERO {
            income = income.saturating_add(txn.amount);
        } else if txn.amount < Decimal::ZERO {
            spent = spent.saturating_add(txn.amount);
        }
    }

    Totals {
        balance: round_cents(income.saturating_add(spent)),
        income: round_cents(income),
        expense: round_cents(spent.abs()),
    }
}

/// Keep transactions whose timestamp starts with `month` (`YYYY-MM`).
pub(crate) fn filter_by_month<'a, I>(transactions: I, month: &str) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|t| t.in_month(month))
        .collect()
}

pub(crate) fn all_time(transactions: &[Transaction]) -> Totals {
    aggregate(transactions)
}

pub(crate) fn monthly(transactions: &[Transaction], month: &str) -> Totals {
    aggregate(filter_by_month(transactions, month))
}

// ── Month keys ────────────────────────────────────────────────

pub(crate) fn current_month() -> String {
    Local::now().format("%Y-%m").to_string()
}

fn first_of_month(month: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").ok()
}

/// Move a `YYYY-MM` key by `delta` calendar months.
pub(crate) fn shift_month(month: &str, delta: i32) -> Option<String> {
    let date = first_of_month(month)?;
    let step = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        date.checked_add_months(step)
    } else {
        date.checked_sub_months(step)
    }?;
    Some(shifted.format("%Y-%m").to_string())
}

/// Accept `YYYY-MM`, `YYYY-M`, `MM` or `M`. Bare months use `year`.
pub(crate) fn parse_month(input: &str, year: i32) -> Option<String> {
    let input = input.trim();
    let candidate = if input.len() <= 2 {
        format!("{year}-{input:0>2}")
    } else if let Some((y, m)) = input.split_once('-') {
        format!("{y}-{m:0>2}")
    } else {
        return None;
    };
    let date = first_of_month(&candidate)?;
    Some(date.format("%Y-%m").to_string())
}

/// `"2024-03"` → `"March 2024"`. Unparseable keys are returned unchanged.
pub(crate) fn month_label(month: &str) -> String {
    first_of_month(month)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| month.to_string())
}

/// Year part of a `YYYY-MM` key, falling back to the current year.
pub(crate) fn month_year(month: &str) -> i32 {
    first_of_month(month)
        .map(|d| d.year())
        .unwrap_or_else(|| Local::now().year())
}
