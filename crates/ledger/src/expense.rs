//! Expense primitives.
//!
//! An `Expense` is a single user-owned spending record. It is created and
//! mutated only through [`Ledger`](crate::Ledger); the store keeps it as-is.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default page size for [`ListFilter`].
pub const DEFAULT_PAGE_LIMIT: i64 = 20;
/// Upper bound for the page size of [`ListFilter`].
pub const MAX_PAGE_LIMIT: i64 = 100;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub owner: String,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted by create and update.
///
/// `date` is optional so that a missing timestamp can be reported as invalid
/// input instead of being silently defaulted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpenseInput {
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: Option<DateTime<Utc>>,
}

impl ExpenseInput {
    #[must_use]
    pub fn new(amount: f64, category: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            amount,
            category: category.into(),
            description: String::new(),
            date: Some(date),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Filters and pagination for listing expenses.
///
/// `from` and `to` are both inclusive (`[from, to]`), in UTC.
#[derive(Clone, Debug, PartialEq)]
pub struct ListFilter {
    /// 1-based page number; values `<= 0` are treated as `1`.
    pub page: i64,
    /// Page size; `<= 0` falls back to 20, values above 100 are capped.
    pub limit: i64,
    /// Case-insensitive exact match on the category. Blank means "any".
    pub category: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            category: None,
            from: None,
            to: None,
        }
    }
}

impl ListFilter {
    #[must_use]
    pub fn page(mut self, page: i64, limit: i64) -> Self {
        self.page = page;
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn window(mut self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Returns `(page, limit)` with out-of-range values replaced.
    pub(crate) fn normalized_pagination(&self) -> (i64, i64) {
        let page = if self.page <= 0 { 1 } else { self.page };
        let limit = match self.limit {
            l if l <= 0 => DEFAULT_PAGE_LIMIT,
            l if l > MAX_PAGE_LIMIT => MAX_PAGE_LIMIT,
            l => l,
        };
        (page, limit)
    }
}

/// Spending totals over a time window.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    pub total_amount: f64,
    /// Category → sum of amounts.
    pub by_category: BTreeMap<String, f64>,
    /// `YYYY-MM` (UTC) → sum of amounts.
    pub by_month: BTreeMap<String, f64>,
}
