use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::{
    Expense, LedgerError, ListFilter, ResultLedger,
    util::{ensure_active, require_non_blank},
};

use super::Ledger;

/// Newest first: `date DESC, created_at DESC, id DESC`.
pub(crate) fn newest_first(a: &Expense, b: &Expense) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| b.id.cmp(&a.id))
}

pub(crate) fn in_window(
    date: DateTime<Utc>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> bool {
    from.is_none_or(|from| date >= from) && to.is_none_or(|to| date <= to)
}

fn validate_window(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> ResultLedger<()> {
    if let (Some(from), Some(to)) = (from, to)
        && from > to
    {
        return Err(LedgerError::InvalidInput(
            "from cannot be after to".to_string(),
        ));
    }
    Ok(())
}

fn paginate(mut items: Vec<Expense>, page: i64, limit: i64) -> Vec<Expense> {
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let start = usize::try_from(page - 1)
        .ok()
        .and_then(|p| p.checked_mul(limit))
        .unwrap_or(usize::MAX);
    if start >= items.len() {
        return Vec::new();
    }
    let end = start.saturating_add(limit).min(items.len());
    items.truncate(end);
    items.split_off(start)
}

impl Ledger {
    /// Lists the expenses of `owner` matching `filter`, newest first, one
    /// page at a time.
    ///
    /// Ties on `date` are broken by `created_at`, then by id, both
    /// descending, so the output is deterministic.
    pub async fn list(
        &self,
        cancel: &CancellationToken,
        owner: &str,
        filter: &ListFilter,
    ) -> ResultLedger<Vec<Expense>> {
        require_non_blank(owner, "owner")?;
        validate_window(filter.from, filter.to)?;
        ensure_active(cancel)?;

        let items = self.store.list_by_owner(cancel, owner).await?;

        let category = filter
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_lowercase);
        let mut matched: Vec<Expense> = items
            .into_iter()
            .filter(|e| {
                category
                    .as_deref()
                    .is_none_or(|c| e.category.to_lowercase() == c)
            })
            .filter(|e| in_window(e.date, filter.from, filter.to))
            .collect();
        matched.sort_by(newest_first);

        let (page, limit) = filter.normalized_pagination();
        Ok(paginate(matched, page, limit))
    }
}
