//! Dashboard projection.
//!
//! [`project`] is a pure transform from an [`Analytics`] aggregate and a list
//! of recent expenses into a presentation-ready [`Snapshot`]. Nothing here is
//! persisted.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::{Analytics, Expense};

/// Number of recent expenses shown as activity.
pub const RECENT_ACTIVITY_LIMIT: i64 = 20;
/// Length of the "friend" sublist.
pub const TOP_ITEMS: usize = 5;
/// Prefix put in front of every formatted amount.
pub const CURRENCY_PREFIX: &str = "INR";

const CATEGORY_SUBTITLE: &str = "category total";
const ACCOUNT_NAME: &str = "Local User";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BalanceItem {
    pub title: String,
    pub subtitle: String,
    pub amount_text: String,
    pub positive: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivityItem {
    pub title: String,
    pub subtitle: String,
    pub amount_text: String,
    pub positive: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub overall_label: String,
    pub overall_amount_text: String,
    pub overall_positive: bool,
    /// First [`TOP_ITEMS`] entries of `group_items`.
    pub friend_items: Vec<BalanceItem>,
    /// Every category, largest total first.
    pub group_items: Vec<BalanceItem>,
    pub activity_items: Vec<ActivityItem>,
    pub account_name: String,
    pub account_email: String,
}

/// Two-decimal fixed point with the currency prefix, e.g. `INR 12.50`.
pub fn format_amount(amount: f64) -> String {
    format!("{CURRENCY_PREFIX} {amount:.2}")
}

/// Derive the dashboard view.
///
/// `recent` is expected in display order already (as returned by
/// [`Ledger::list`](crate::Ledger::list)).
pub fn project(aggregate: &Analytics, recent: &[Expense], owner: &str) -> Snapshot {
    let mut totals: Vec<(&str, f64)> = aggregate
        .by_category
        .iter()
        .map(|(category, amount)| (category.as_str(), *amount))
        .collect();
    // Stable, keyed on amount only.
    totals.sort_by(|a, b| b.1.total_cmp(&a.1));

    let group_items: Vec<BalanceItem> = totals
        .into_iter()
        .map(|(category, amount)| BalanceItem {
            title: category.to_string(),
            subtitle: CATEGORY_SUBTITLE.to_string(),
            amount_text: format_amount(amount),
            positive: amount >= 0.0,
        })
        .collect();
    let friend_items = group_items.iter().take(TOP_ITEMS).cloned().collect();

    let activity_items = recent
        .iter()
        .map(|expense| {
            let title = if expense.description.trim().is_empty() {
                format!("Expense in {}", expense.category)
            } else {
                expense.description.clone()
            };
            ActivityItem {
                title,
                subtitle: expense.date.to_rfc3339_opts(SecondsFormat::Secs, true),
                amount_text: format!("You owe {}", format_amount(expense.amount)),
                positive: false,
            }
        })
        .collect();

    let total = aggregate.total_amount;
    let overall_label = if total >= 0.0 {
        "Overall, you are owed"
    } else {
        "Overall, you owe"
    };

    Snapshot {
        overall_label: overall_label.to_string(),
        overall_amount_text: format_amount(total.abs()),
        overall_positive: total >= 0.0,
        friend_items,
        group_items,
        activity_items,
        account_name: ACCOUNT_NAME.to_string(),
        account_email: format!("{owner}@local"),
    }
}
