//! The module contains the errors the ledger can throw.
//!
//! Two layers exist:
//!
//! - [`StoreError`] is raised by an [`ExpenseStore`] implementation and never
//!   leaves the ledger.
//! - [`LedgerError`] is what callers of [`Ledger`] observe. Every failure is
//!   classified into exactly one of its variants.
//!
//!  [`ExpenseStore`]: crate::ExpenseStore
//!  [`Ledger`]: crate::Ledger
use thiserror::Error;

/// Ledger errors, as seen by the transport layer.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("\"{0}\" not found")]
    NotFound(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("operation cancelled")]
    Cancelled,
    #[error("internal error: {0}")]
    Internal(String),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::Cancelled, Self::Cancelled) => true,
            (Self::Internal(a), Self::Internal(b)) => a == b,
            _ => false,
        }
    }
}

/// Errors raised by a record store.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("expense \"{0}\" not found")]
    RecordNotFound(String),
    #[error("store operation cancelled")]
    Cancelled,
    #[error("store backend failure: {0}")]
    Backend(String),
}

impl From<StoreError> for LedgerError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::RecordNotFound(id) => Self::NotFound(id),
            StoreError::Cancelled => Self::Cancelled,
            StoreError::Backend(reason) => Self::Internal(reason),
        }
    }
}
