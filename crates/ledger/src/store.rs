//! Record storage for expenses.
//!
//! [`ExpenseStore`] is the only persistence seam of the ledger. Any backend
//! (the bundled [`InMemoryStore`], a database, ...) can be plugged into
//! [`Ledger`](crate::Ledger) as long as it honours the contract below:
//!
//! - `create` inserts or overwrites by id and always succeeds for a
//!   well-formed record.
//! - `get_by_id`, `update` and `delete` fail with
//!   [`StoreError::RecordNotFound`] when the id is unknown; `update` never
//!   creates.
//! - `list_by_owner` returns the (unordered) records of one owner, possibly
//!   none.
//!
//! Every call receives the caller's cancellation token. A cancelled call must
//! either complete fully or leave the store untouched.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio_util::sync::CancellationToken;

use crate::{Expense, StoreError};

pub type ResultStore<T> = Result<T, StoreError>;

#[async_trait]
pub trait ExpenseStore: Send + Sync {
    async fn create(&self, cancel: &CancellationToken, expense: Expense) -> ResultStore<Expense>;

    async fn get_by_id(&self, cancel: &CancellationToken, id: &str) -> ResultStore<Expense>;

    async fn update(&self, cancel: &CancellationToken, expense: Expense) -> ResultStore<Expense>;

    async fn delete(&self, cancel: &CancellationToken, id: &str) -> ResultStore<()>;

    async fn list_by_owner(
        &self,
        cancel: &CancellationToken,
        owner: &str,
    ) -> ResultStore<Vec<Expense>>;
}

/// Keyed in-memory store guarded by a single readers-writer lock.
///
/// Reads run in parallel; writes are exclusive. Mutations happen while the
/// write guard is held and never yield, so they are atomic with respect to
/// cancellation.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<String, Expense>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn read(
        &self,
        cancel: &CancellationToken,
    ) -> ResultStore<RwLockReadGuard<'_, HashMap<String, Expense>>> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(StoreError::Cancelled),
            guard = self.records.read() => Ok(guard),
        }
    }

    async fn write(
        &self,
        cancel: &CancellationToken,
    ) -> ResultStore<RwLockWriteGuard<'_, HashMap<String, Expense>>> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(StoreError::Cancelled),
            guard = self.records.write() => Ok(guard),
        }
    }
}

#[async_trait]
impl ExpenseStore for InMemoryStore {
    async fn create(&self, cancel: &CancellationToken, expense: Expense) -> ResultStore<Expense> {
        let mut records = self.write(cancel).await?;
        records.insert(expense.id.clone(), expense.clone());
        Ok(expense)
    }

    async fn get_by_id(&self, cancel: &CancellationToken, id: &str) -> ResultStore<Expense> {
        let records = self.read(cancel).await?;
        records
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::RecordNotFound(id.to_string()))
    }

    async fn update(&self, cancel: &CancellationToken, expense: Expense) -> ResultStore<Expense> {
        let mut records = self.write(cancel).await?;
        let slot = records
            .get_mut(&expense.id)
            .ok_or_else(|| StoreError::RecordNotFound(expense.id.clone()))?;
        *slot = expense.clone();
        Ok(expense)
    }

    async fn delete(&self, cancel: &CancellationToken, id: &str) -> ResultStore<()> {
        let mut records = self.write(cancel).await?;
        records
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::RecordNotFound(id.to_string()))
    }

    async fn list_by_owner(
        &self,
        cancel: &CancellationToken,
        owner: &str,
    ) -> ResultStore<Vec<Expense>> {
        let records = self.read(cancel).await?;
        Ok(records
            .values()
            .filter(|e| e.owner == owner)
            .cloned()
            .collect())
    }
}
