mod input;
mod transaction;

pub use input::{
    normalize_date_time, now_date_time, parse_amount, parse_date_time, Entry, TransactionInput,
    TransactionPatch, MAX_AMOUNT,
};
pub use transaction::Transaction;
