//! Expense ledger: the business rules behind the expense tracker.
//!
//! [`Ledger`] validates input, enforces per-owner access, lists expenses in a
//! deterministic order, aggregates spending over time windows and derives the
//! [`dashboard`] view. Records live behind the [`ExpenseStore`] trait;
//! [`InMemoryStore`] is the default implementation.
//!
//! Every operation takes a [`CancellationToken`]; once it is cancelled the
//! call fails with [`LedgerError::Cancelled`] without a partial write.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

pub use error::{LedgerError, StoreError};
pub use expense::{Analytics, DEFAULT_PAGE_LIMIT, Expense, ExpenseInput, ListFilter, MAX_PAGE_LIMIT};
pub use ops::{Clock, IdGenerator, Ledger, LedgerBuilder};
pub use store::{ExpenseStore, InMemoryStore, ResultStore};
pub use util::parse_timestamp;

pub mod dashboard;
mod error;
mod expense;
mod ops;
mod store;
mod util;

type ResultLedger<T> = Result<T, LedgerError>;
