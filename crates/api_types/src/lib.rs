use serde::{Deserialize, Serialize};

pub mod health {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Health {
        pub status: String,
    }
}

pub mod error {
    use super::*;

    /// Error body returned by every failing endpoint.
    ///
    /// ```json
    /// {"error": {"code": "NOT_FOUND", "message": "expense not found"}}
    /// ```
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ErrorEnvelope {
        pub error: ApiError,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ApiError {
        /// Stable machine-readable code (`INVALID_ARGUMENT`, `NOT_FOUND`, ...).
        pub code: String,
        pub message: String,
    }
}

pub mod expense {
    use std::collections::BTreeMap;

    use chrono::{DateTime, Utc};

    use super::*;

    /// Request body for creating or updating an expense.
    ///
    /// Missing fields fall back to their zero value and are then rejected by
    /// validation.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    pub struct ExpensePayload {
        pub amount: f64,
        pub category: String,
        pub description: String,
        /// RFC3339 timestamp.
        pub date: String,
    }

    /// An expense as exposed to clients. The owner is never included.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseView {
        pub id: String,
        pub amount: f64,
        pub category: String,
        pub description: String,
        pub date: DateTime<Utc>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// Query string of `GET /api/v1/expenses`.
    ///
    /// `page` and `limit` are kept as text: unparsable values fall back to the
    /// defaults instead of failing the request.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseListQuery {
        pub page: Option<String>,
        pub limit: Option<String>,
        pub category: Option<String>,
        /// RFC3339 timestamp, inclusive.
        pub from: Option<String>,
        /// RFC3339 timestamp, inclusive.
        pub to: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub expenses: Vec<ExpenseView>,
    }

    /// Query string of `GET /api/v1/analytics`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AnalyticsQuery {
        pub from: Option<String>,
        pub to: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AnalyticsView {
        pub total_amount: f64,
        pub by_category: BTreeMap<String, f64>,
        /// Keyed by UTC month, `YYYY-MM`.
        pub by_month: BTreeMap<String, f64>,
    }
}

pub mod dashboard {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DashboardItem {
        pub title: String,
        pub subtitle: String,
        pub amount_text: String,
        pub positive: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DashboardSnapshot {
        pub overall_label: String,
        pub overall_amount_text: String,
        pub overall_positive: bool,
        pub friend_items: Vec<DashboardItem>,
        pub group_items: Vec<DashboardItem>,
        pub activity_items: Vec<DashboardItem>,
        pub account_name: String,
        pub account_email: String,
    }
}

pub mod theme {
    use super::*;

    /// A selectable color theme. Accents are ARGB values.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ThemePack {
        pub family_id: String,
        pub display_name: String,
        pub light_accent: u32,
        pub dark_accent: u32,
        pub high_contrast_accent: u32,
    }
}
