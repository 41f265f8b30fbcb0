use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::{
    Analytics, ListFilter, ResultLedger,
    dashboard::{self, RECENT_ACTIVITY_LIMIT, Snapshot},
    util::{ensure_active, require_non_blank},
};

use super::{Ledger, list::in_window};

/// UTC month bucket key, `YYYY-MM`.
pub(crate) fn month_key(date: DateTime<Utc>) -> String {
    date.format("%Y-%m").to_string()
}

impl Ledger {
    /// Sums the expenses of `owner` inside the optional inclusive window.
    ///
    /// A missing bound leaves that side open. When nothing matches the maps
    /// are empty and the total is zero.
    pub async fn analytics(
        &self,
        cancel: &CancellationToken,
        owner: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> ResultLedger<Analytics> {
        require_non_blank(owner, "owner")?;
        ensure_active(cancel)?;

        let items = self.store.list_by_owner(cancel, owner).await?;

        let mut result = Analytics::default();
        for expense in items.iter().filter(|e| in_window(e.date, from, to)) {
            result.total_amount += expense.amount;
            *result
                .by_category
                .entry(expense.category.clone())
                .or_insert(0.0) += expense.amount;
            *result.by_month.entry(month_key(expense.date)).or_insert(0.0) += expense.amount;
        }
        Ok(result)
    }

    /// Builds the dashboard view: all-time analytics plus the most recent
    /// page of expenses.
    pub async fn dashboard_snapshot(
        &self,
        cancel: &CancellationToken,
        owner: &str,
    ) -> ResultLedger<Snapshot> {
        let aggregate = self.analytics(cancel, owner, None, None).await?;
        let recent = self
            .list(
                cancel,
                owner,
                &ListFilter::default().page(1, RECENT_ACTIVITY_LIMIT),
            )
            .await?;
        Ok(dashboard::project(&aggregate, &recent, owner))
    }
}
