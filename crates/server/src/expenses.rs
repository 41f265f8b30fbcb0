//! Expenses API endpoints

use api_types::expense::{ExpenseListQuery, ExpenseListResponse, ExpensePayload, ExpenseView};
use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, Query, State, rejection::BytesRejection, rejection::QueryRejection},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use ledger::{DEFAULT_PAGE_LIMIT, Expense, ExpenseInput, ListFilter, parse_timestamp};
use tokio_util::sync::CancellationToken;

use crate::{ServerError, auth::Owner, server::ServerState};

pub(crate) fn map_expense(expense: Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        amount: expense.amount,
        category: expense.category,
        description: expense.description,
        date: expense.date,
        created_at: expense.created_at,
        updated_at: expense.updated_at,
    }
}

/// Optional RFC3339 query parameter; blank means "not set".
pub(crate) fn parse_time_param(
    value: Option<&str>,
    name: &str,
) -> Result<Option<DateTime<Utc>>, ServerError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => parse_timestamp(raw)
            .map(Some)
            .map_err(|_| ServerError::InvalidArgument(format!("invalid '{name}' query param"))),
    }
}

/// A blank path id never names a resource.
fn require_path_id(id: &str) -> Result<(), ServerError> {
    if id.trim().is_empty() {
        return Err(ServerError::route_not_found());
    }
    Ok(())
}

fn parse_int_or_default(value: Option<&str>, fallback: i64) -> i64 {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse().ok())
        .unwrap_or(fallback)
}

/// Decodes the body as JSON whatever its `Content-Type`.
fn payload_into_input(body: Result<Bytes, BytesRejection>) -> Result<ExpenseInput, ServerError> {
    let payload: ExpensePayload = body
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .ok_or_else(|| {
            ServerError::InvalidArgument("request body must be valid JSON".to_string())
        })?;
    let date = parse_timestamp(&payload.date)
        .map_err(|_| ServerError::InvalidArgument("date must be RFC3339".to_string()))?;

    Ok(ExpenseInput::new(payload.amount, payload.category, date).description(payload.description))
}

pub async fn list(
    Extension(owner): Extension<Owner>,
    Extension(cancel): Extension<CancellationToken>,
    State(state): State<ServerState>,
    query: Result<Query<ExpenseListQuery>, QueryRejection>,
) -> Result<Json<ExpenseListResponse>, ServerError> {
    let Query(query) =
        query.map_err(|_| ServerError::InvalidArgument("invalid query string".to_string()))?;

    let filter = ListFilter {
        page: parse_int_or_default(query.page.as_deref(), 1),
        limit: parse_int_or_default(query.limit.as_deref(), DEFAULT_PAGE_LIMIT),
        category: query.category,
        from: parse_time_param(query.from.as_deref(), "from")?,
        to: parse_time_param(query.to.as_deref(), "to")?,
    };

    let expenses = state
        .ledger
        .list(&cancel, owner.as_str(), &filter)
        .await?
        .into_iter()
        .map(map_expense)
        .collect();

    Ok(Json(ExpenseListResponse { expenses }))
}

pub async fn create(
    Extension(owner): Extension<Owner>,
    Extension(cancel): Extension<CancellationToken>,
    State(state): State<ServerState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let input = payload_into_input(body)?;
    let expense = state.ledger.create(&cancel, owner.as_str(), input).await?;
    tracing::debug!(id = %expense.id, "expense created");

    Ok((StatusCode::CREATED, Json(map_expense(expense))))
}

pub async fn update(
    Extension(owner): Extension<Owner>,
    Extension(cancel): Extension<CancellationToken>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ExpenseView>, ServerError> {
    require_path_id(&id)?;
    let input = payload_into_input(body)?;
    let expense = state
        .ledger
        .update(&cancel, owner.as_str(), &id, input)
        .await?;
    tracing::debug!(id = %expense.id, "expense updated");

    Ok(Json(map_expense(expense)))
}

pub async fn delete(
    Extension(owner): Extension<Owner>,
    Extension(cancel): Extension<CancellationToken>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    require_path_id(&id)?;
    state.ledger.delete(&cancel, owner.as_str(), &id).await?;
    tracing::debug!(id = %id, "expense deleted");

    Ok(StatusCode::NO_CONTENT)
}
