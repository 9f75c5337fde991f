use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::db::KeyValueStore;
use crate::export;
use crate::models::{Transaction, TransactionInput, TransactionPatch};

/// Key under which the whole collection is persisted.
pub(crate) const STORAGE_KEY: &str = "exp-z-data";

/// Owns the canonical transaction list and keeps the key-value store in sync.
///
/// Every effective mutation rewrites the full collection under
/// [`STORAGE_KEY`] and bumps [`revision`](Self::revision), which is what
/// derived views should key their caches on.
pub(crate) struct TransactionStore {
    kv: Box<dyn KeyValueStore>,
    transactions: Vec<Transaction>,
    last_id: i64,
    revision: u64,
}

impl TransactionStore {
    /// Read the persisted collection. Missing or unreadable state yields an
    /// empty store; this never fails.
    pub(crate) fn load(kv: Box<dyn KeyValueStore>) -> Self {
        let transactions = match kv.get(STORAGE_KEY) {
            Ok(Some(raw)) => decode(&raw),
            Ok(None) => {
                debug!("no persisted transactions");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "could not read persisted transactions, starting empty");
                Vec::new()
            }
        };

        let last_id = transactions.iter().map(|t| t.id).max().unwrap_or(0);
        info!(count = transactions.len(), "loaded transactions");

        Self {
            kv,
            transactions,
            last_id,
            revision: 0,
        }
    }

    /// Stored order: newest-created first.
    pub(crate) fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub(crate) fn get(&self, id: i64) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub(crate) fn len(&self) -> usize {
        self.transactions.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub(crate) fn revision(&self) -> u64 {
        self.revision
    }

    /// Validate and prepend a new transaction. Invalid input is a silent
    /// no-op and returns `Ok(None)`.
    pub(crate) fn add(&mut self, input: &TransactionInput) -> Result<Option<Transaction>> {
        let Some(entry) = input.validate() else {
            debug!("add skipped: input did not validate");
            return Ok(None);
        };

        let txn = Transaction {
            id: self.next_id(),
            text: entry.text,
            amount: entry.amount,
            date_time: entry.date_time,
        };
        self.transactions.insert(0, txn.clone());
        self.commit()?;
        info!(id = txn.id, amount = %txn.amount, "added transaction");
        Ok(Some(txn))
    }

    /// Apply `patch` to the transaction with `id`, keeping the id. Unknown ids
    /// and invalid patches are no-ops. Nothing is persisted when the merged
    /// result equals what is already stored.
    pub(crate) fn edit(&mut self, id: i64, patch: &TransactionPatch) -> Result<Option<Transaction>> {
        let Some(pos) = self.position(id) else {
            debug!(id, "edit skipped: unknown id");
            return Ok(None);
        };
        let Some(entry) = patch.apply(&self.transactions[pos]) else {
            debug!(id, "edit skipped: patch did not validate");
            return Ok(None);
        };

        let updated = Transaction {
            id,
            text: entry.text,
            amount: entry.amount,
            date_time: entry.date_time,
        };
        if updated == self.transactions[pos] {
            return Ok(Some(updated));
        }

        self.transactions[pos] = updated.clone();
        self.commit()?;
        info!(id, "edited transaction");
        Ok(Some(updated))
    }

    /// Remove the transaction with `id`, returning it. Unknown ids are a no-op.
    pub(crate) fn delete(&mut self, id: i64) -> Result<Option<Transaction>> {
        let Some(pos) = self.position(id) else {
            debug!(id, "delete skipped: unknown id");
            return Ok(None);
        };
        let removed = self.transactions.remove(pos);
        self.commit()?;
        info!(id, "deleted transaction");
        Ok(Some(removed))
    }

    /// Pretty JSON copy of the full collection, for backups.
    pub(crate) fn export_snapshot(&self) -> Result<Vec<u8>> {
        export::serialize(&self.transactions)
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.transactions.iter().position(|t| t.id == id)
    }

    /// Creation-time millis, bumped past the last issued id on collision.
    fn next_id(&mut self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let id = now.max(self.last_id.saturating_add(1));
        self.last_id = id;
        id
    }

    fn commit(&mut self) -> Result<()> {
        self.revision += 1;
        let json = serde_json::to_string(&self.transactions)
            .context("Failed to encode transactions")?;
        self.kv
            .set(STORAGE_KEY, &json)
            .context("Failed to persist transactions")?;
        debug!(count = self.transactions.len(), revision = self.revision, "persisted");
        Ok(())
    }
}

/// Parse the persisted array record by record. A record that does not fit
/// (missing fields, an amount outside `Decimal`'s range) is skipped so the
/// rest survive; a value that is not an array yields nothing.
fn decode(raw: &str) -> Vec<Transaction> {
    let records: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, "persisted transactions are malformed, starting empty");
            return Vec::new();
        }
    };

    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Transaction>(record) {
            Ok(txn) => Some(txn),
            Err(e) => {
                warn!(index, error = %e, "skipping unreadable transaction");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests;
