use std::sync::{Mutex, MutexGuard, PoisonError};

use api_types::transaction::{
    DeleteMany, NewTransaction, Transaction, TransactionFilters, TransactionPatch,
};

use crate::{
    api::ApiClient,
    error::{ClientError, Result},
};

/// Client-held view of the remote transaction collection, ordered most
/// recent first and keyed uniquely by `id`.
///
/// Every method runs on the caller's task; the cache is guarded by a mutex
/// that is never held across an await, so interleavings happen only at
/// suspension points. In-flight requests are never cancelled: of two
/// concurrent `load` calls, whichever response arrives last wins, even for
/// a stale filter. Callers that need freshness watch [`revision`] and
/// re-`load` instead of relying on request ordering.
///
/// [`revision`]: TransactionStore::revision
#[derive(Debug)]
pub struct TransactionStore {
    api: ApiClient,
    state: Mutex<CacheState>,
}

#[derive(Debug, Default)]
struct CacheState {
    transactions: Vec<Transaction>,
    revision: u64,
}

impl TransactionStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: Mutex::new(CacheState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the entire cache with the remote result set for `filters`.
    ///
    /// Does not bump the revision: a load reconciles, it does not mutate.
    pub async fn load(&self, filters: &TransactionFilters) -> Result<Vec<Transaction>> {
        let transactions = self.api.list_transactions(filters).await?;
        self.state().transactions = transactions.clone();
        Ok(transactions)
    }

    /// Fetches a single transaction from the remote store, bypassing the
    /// cache.
    pub async fn get(&self, id: i64) -> Result<Transaction> {
        self.api.get_transaction(id).await
    }

    /// Submits one record; on success the server-assigned row is prepended
    /// to the cache. The cache is untouched on failure.
    pub async fn create(&self, record: NewTransaction) -> Result<Transaction> {
        validate(&record)?;
        let created = self.api.create_transaction(&record).await?;
        let mut state = self.state();
        state.transactions.insert(0, created.clone());
        state.revision += 1;
        Ok(created)
    }

    /// Submits all records as one bulk request. All-or-nothing: a failure
    /// creates zero cache entries. On success the results are prepended in
    /// response order.
    pub async fn create_bulk(&self, records: &[NewTransaction]) -> Result<Vec<Transaction>> {
        for record in records {
            validate(record)?;
        }
        let created = self.api.create_transactions(records).await?;
        let mut state = self.state();
        let mut next = created.clone();
        next.extend(state.transactions.drain(..));
        state.transactions = next;
        state.revision += 1;
        Ok(created)
    }

    /// Removes the row optimistically, then issues the remote delete. If
    /// the remote call fails the row is re-inserted at its original
    /// position and the error propagates.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let removed = {
            let mut state = self.state();
            let position = state.transactions.iter().position(|tx| tx.id == id);
            position.map(|pos| (pos, state.transactions.remove(pos)))
        };

        match self.api.delete_transaction(id).await {
            Ok(()) => {
                self.state().revision += 1;
                Ok(())
            }
            Err(err) => {
                if let Some((pos, tx)) = removed {
                    let mut state = self.state();
                    let pos = pos.min(state.transactions.len());
                    state.transactions.insert(pos, tx);
                }
                Err(err)
            }
        }
    }

    /// Batched variant of [`delete`]: one remote call for the whole id set,
    /// same optimistic-removal-with-rollback policy.
    ///
    /// [`delete`]: TransactionStore::delete
    pub async fn delete_bulk(&self, ids: &[i64]) -> Result<()> {
        if ids.is_empty() {
            return Err(ClientError::Validation(
                "no transactions selected".to_string(),
            ));
        }

        let removed = {
            let mut state = self.state();
            let removed: Vec<(usize, Transaction)> = state
                .transactions
                .iter()
                .enumerate()
                .filter(|(_, tx)| ids.contains(&tx.id))
                .map(|(pos, tx)| (pos, tx.clone()))
                .collect();
            state.transactions.retain(|tx| !ids.contains(&tx.id));
            removed
        };

        let payload = DeleteMany { ids: ids.to_vec() };
        match self.api.delete_transactions(&payload).await {
            Ok(()) => {
                self.state().revision += 1;
                Ok(())
            }
            Err(err) => {
                let mut state = self.state();
                for (pos, tx) in removed {
                    let pos = pos.min(state.transactions.len());
                    state.transactions.insert(pos, tx);
                }
                Err(err)
            }
        }
    }

    /// Partial remote update. The cache is not patched in place; consumers
    /// observe the revision bump and re-`load`.
    pub async fn update(&self, id: i64, patch: &TransactionPatch) -> Result<Transaction> {
        let updated = self.api.update_transaction(id, patch).await?;
        self.state().revision += 1;
        Ok(updated)
    }

    /// Monotonically increasing dirty counter, bumped after every
    /// successful mutation. Consumers compare revisions to decide whether
    /// to re-`load`; they never watch the cache contents directly.
    pub fn revision(&self) -> u64 {
        self.state().revision
    }

    /// Copy of the current cache, most recent first.
    pub fn snapshot(&self) -> Vec<Transaction> {
        self.state().transactions.clone()
    }
}

fn validate(record: &NewTransaction) -> Result<()> {
    if record.amount_minor < 0 {
        return Err(ClientError::Validation(
            "amount must not be negative".to_string(),
        ));
    }
    if record.category.trim().is_empty() {
        return Err(ClientError::Validation(
            "category must not be empty".to_string(),
        ));
    }
    Ok(())
}
