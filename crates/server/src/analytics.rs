//! Analytics and dashboard API endpoints

use api_types::{
    dashboard::{DashboardItem, DashboardSnapshot},
    expense::{AnalyticsQuery, AnalyticsView},
};
use axum::{
    Extension, Json,
    extract::{Query, State, rejection::QueryRejection},
};
use ledger::dashboard::{ActivityItem, BalanceItem, Snapshot};
use tokio_util::sync::CancellationToken;

use crate::{ServerError, auth::Owner, expenses::parse_time_param, server::ServerState};

fn map_balance(item: BalanceItem) -> DashboardItem {
    DashboardItem {
        title: item.title,
        subtitle: item.subtitle,
        amount_text: item.amount_text,
        positive: item.positive,
    }
}

fn map_activity(item: ActivityItem) -> DashboardItem {
    DashboardItem {
        title: item.title,
        subtitle: item.subtitle,
        amount_text: item.amount_text,
        positive: item.positive,
    }
}

fn map_snapshot(snapshot: Snapshot) -> DashboardSnapshot {
    DashboardSnapshot {
        overall_label: snapshot.overall_label,
        overall_amount_text: snapshot.overall_amount_text,
        overall_positive: snapshot.overall_positive,
        friend_items: snapshot.friend_items.into_iter().map(map_balance).collect(),
        group_items: snapshot.group_items.into_iter().map(map_balance).collect(),
        activity_items: snapshot
            .activity_items
            .into_iter()
            .map(map_activity)
            .collect(),
        account_name: snapshot.account_name,
        account_email: snapshot.account_email,
    }
}

/// Handle requests for spending totals
pub async fn get_analytics(
    Extension(owner): Extension<Owner>,
    Extension(cancel): Extension<CancellationToken>,
    State(state): State<ServerState>,
    query: Result<Query<AnalyticsQuery>, QueryRejection>,
) -> Result<Json<AnalyticsView>, ServerError> {
    let Query(query) =
        query.map_err(|_| ServerError::InvalidArgument("invalid query string".to_string()))?;
    let from = parse_time_param(query.from.as_deref(), "from")?;
    let to = parse_time_param(query.to.as_deref(), "to")?;

    let analytics = state
        .ledger
        .analytics(&cancel, owner.as_str(), from, to)
        .await?;

    Ok(Json(AnalyticsView {
        total_amount: analytics.total_amount,
        by_category: analytics.by_category,
        by_month: analytics.by_month,
    }))
}

pub async fn dashboard_snapshot(
    Extension(owner): Extension<Owner>,
    Extension(cancel): Extension<CancellationToken>,
    State(state): State<ServerState>,
) -> Result<Json<DashboardSnapshot>, ServerError> {
    let snapshot = state
        .ledger
        .dashboard_snapshot(&cancel, owner.as_str())
        .await?;

    Ok(Json(map_snapshot(snapshot)))
}
