use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single income or expense entry.
///
/// Serialized field names match the persisted layout (`id`, `text`, `amount`,
/// `dateTime`); `amount` is written as a JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub text: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub date_time: String,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_expense(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub fn abs_amount(&self) -> Decimal {
        self.amount.abs()
    }

    /// Calendar day key: everything before the `T` separator (`YYYY-MM-DD`).
    pub fn day_key(&self) -> &str {
        self.date_time
            .split_once('T')
            .map_or(self.date_time.as_str(), |(day, _)| day)
    }

    /// Prefix match against a `YYYY-MM` key. No calendar parsing.
    pub fn in_month(&self, month: &str) -> bool {
        self.date_time.starts_with(month)
    }
}
