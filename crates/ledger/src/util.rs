//! Internal helpers for input validation and normalization.
//!
//! Only [`parse_timestamp`] is part of the public API; the rest centralize
//! the checks shared by the ledger operations.

use chrono::{DateTime, NaiveDate, Utc};
use tokio_util::sync::CancellationToken;

use crate::{ExpenseInput, LedgerError, ResultLedger};

/// Parse an RFC 3339 timestamp and normalize it to UTC.
///
/// This is the only accepted date-time text format; anything else is
/// reported as [`LedgerError::InvalidInput`].
pub fn parse_timestamp(value: &str) -> ResultLedger<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| LedgerError::InvalidInput(format!("\"{value}\" is not an RFC 3339 timestamp")))
}

/// `0001-01-01T00:00:00Z`, the "unset" timestamp some clients send for an
/// empty date.
pub(crate) fn is_zero_instant(date: DateTime<Utc>) -> bool {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .is_some_and(|zero| date.naive_utc() == zero)
}

pub(crate) fn require_non_blank(value: &str, label: &str) -> ResultLedger<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::InvalidInput(format!("{label} is required")));
    }
    Ok(())
}

pub(crate) fn ensure_active(cancel: &CancellationToken) -> ResultLedger<()> {
    if cancel.is_cancelled() {
        return Err(LedgerError::Cancelled);
    }
    Ok(())
}

/// Input fields after validation, ready to be written on a record.
pub(crate) struct NormalizedInput {
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: DateTime<Utc>,
}

pub(crate) fn normalize_input(input: &ExpenseInput) -> ResultLedger<NormalizedInput> {
    if !input.amount.is_finite() || input.amount <= 0.0 {
        return Err(LedgerError::InvalidInput("amount must be > 0".to_string()));
    }
    require_non_blank(&input.category, "category")?;
    let date = input
        .date
        .filter(|date| !is_zero_instant(*date))
        .ok_or_else(|| LedgerError::InvalidInput("date is required".to_string()))?;

    Ok(NormalizedInput {
        amount: input.amount,
        category: input.category.trim().to_string(),
        description: input.description.trim().to_string(),
        date,
    })
}
