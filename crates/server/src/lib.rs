use api_types::error::{ApiError, ErrorEnvelope};
use axum::{Json, http::StatusCode, response::IntoResponse};
use ledger::LedgerError;

pub use auth::{AuthError, Owner, StaticVerifier, TokenVerifier};
pub use server::{ServerState, router, run_with_listener};

mod analytics;
mod auth;
mod expenses;
mod server;
mod theme;

pub mod types {
    pub mod expense {
        pub use api_types::expense::{
            AnalyticsQuery, AnalyticsView, ExpenseListQuery, ExpenseListResponse, ExpensePayload,
            ExpenseView,
        };
    }

    pub mod dashboard {
        pub use api_types::dashboard::{DashboardItem, DashboardSnapshot};
    }

    pub mod theme {
        pub use api_types::theme::ThemePack;
    }

    pub mod error {
        pub use api_types::error::{ApiError, ErrorEnvelope};
    }
}

#[derive(Debug)]
pub enum ServerError {
    Ledger(LedgerError),
    /// Request could not be decoded (bad JSON, bad timestamp, ...).
    InvalidArgument(String),
    /// Rejected before reaching the ledger (auth, routing).
    Rejected {
        status: StatusCode,
        code: &'static str,
        message: &'static str,
    },
}

impl ServerError {
    pub(crate) fn unauthorized(code: &'static str, message: &'static str) -> Self {
        Self::Rejected {
            status: StatusCode::UNAUTHORIZED,
            code,
            message,
        }
    }

    pub(crate) fn route_not_found() -> Self {
        Self::Rejected {
            status: StatusCode::NOT_FOUND,
            code: "NOT_FOUND",
            message: "resource not found",
        }
    }
}

fn status_for_ledger_error(err: &LedgerError) -> (StatusCode, &'static str) {
    match err {
        LedgerError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
        LedgerError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        LedgerError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        LedgerError::Cancelled => (StatusCode::SERVICE_UNAVAILABLE, "CANCELLED"),
        LedgerError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
    }
}

fn message_for_ledger_error(err: LedgerError) -> String {
    match err {
        LedgerError::InvalidInput(_) => err.to_string(),
        LedgerError::NotFound(_) => "expense not found".to_string(),
        LedgerError::Forbidden(_) => "not allowed to access this expense".to_string(),
        LedgerError::Cancelled => "request cancelled".to_string(),
        LedgerError::Internal(reason) => {
            tracing::error!("ledger internal error: {reason}");
            "internal server error".to_string()
        }
    }
}

fn envelope(status: StatusCode, code: &str, message: String) -> axum::response::Response {
    let body = ErrorEnvelope {
        error: ApiError {
            code: code.to_string(),
            message,
        },
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ServerError::Ledger(err) => {
                let (status, code) = status_for_ledger_error(&err);
                envelope(status, code, message_for_ledger_error(err))
            }
            ServerError::InvalidArgument(message) => {
                envelope(StatusCode::BAD_REQUEST, "INVALID_ARGUMENT", message)
            }
            ServerError::Rejected {
                status,
                code,
                message,
            } => envelope(status, code, message.to_string()),
        }
    }
}

impl From<LedgerError> for ServerError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}
