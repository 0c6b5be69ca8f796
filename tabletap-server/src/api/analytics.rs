//! Sales analytics
//!
//! - `GET /api/analytics/daily?date=YYYY-MM-DD` — one day's order counts,
//!   revenue and the hour-of-day histogram
//! - `GET /api/analytics/monthly?year=&month=` — a calendar month plus the
//!   month's top items
//! - `GET /api/analytics/top-items?days=&limit=` — best sellers by revenue
//!
//! Reports are composed from tenant-scoped reads and folded here; revenue
//! counts served orders only. All windows are UTC.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Extension, Router, middleware};
use chrono::{NaiveDate, Utc};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::api::tenant_record;
use crate::auth::middleware::{ActingTenant, require_capability};
use crate::core::ServerState;
use crate::db::repository::{
    AnalyticsRepository, OrderMetrics, TopItem, fold_metrics, fold_peak_hours, fold_top_items,
};
use shared::{ApiResponse, AppError, Capability};

const DEFAULT_TOP_ITEMS: usize = 10;
const DEFAULT_WINDOW_DAYS: i64 = 30;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/analytics/daily", get(daily_report))
        .route("/api/analytics/monthly", get(monthly_report))
        .route("/api/analytics/top-items", get(top_items))
        .layer(middleware::from_fn(require_capability(&[
            Capability::ViewAnalytics,
        ])))
}

// ── Query / Response types ──

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct TopItemsQuery {
    pub days: Option<i64>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct DailyReport {
    pub date: String,
    pub metrics: OrderMetrics,
    /// Orders placed per UTC hour, index 0 = midnight
    pub peak_hours: [u32; 24],
}

#[derive(Debug, Serialize)]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub metrics: OrderMetrics,
    pub top_items: Vec<TopItem>,
}

#[derive(Debug, Serialize)]
pub struct TopItemsReport {
    pub period: String,
    pub items: Vec<TopItem>,
}

// ── GET /api/analytics/daily ──

pub async fn daily_report(
    State(state): State<ServerState>,
    Extension(acting): Extension<ActingTenant>,
    Query(query): Query<DailyQuery>,
) -> Result<ApiResponse<DailyReport>, AppError> {
    let tenant = tenant_record(&acting)?;

    let date = match query.date.as_deref() {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| AppError::validation("Date must be formatted as YYYY-MM-DD"))?,
        None => Utc::now().date_naive(),
    };
    let (start, end) = day_window(date)?;

    let orders = AnalyticsRepository::new(state.db.clone())
        .orders_created_between(&tenant, start, end)
        .await?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        Some(DailyReport {
            date: date.format("%Y-%m-%d").to_string(),
            metrics: fold_metrics(&orders),
            peak_hours: fold_peak_hours(&orders),
        }),
        "Daily sales report fetched successfully",
    ))
}

// ── GET /api/analytics/monthly ──

pub async fn monthly_report(
    State(state): State<ServerState>,
    Extension(acting): Extension<ActingTenant>,
    Query(query): Query<MonthlyQuery>,
) -> Result<ApiResponse<MonthlyReport>, AppError> {
    let tenant = tenant_record(&acting)?;

    let (Some(year), Some(month)) = (query.year, query.month) else {
        return Err(AppError::validation("Year and month are required"));
    };
    let (start, end) = month_window(year, month)?;

    let repo = AnalyticsRepository::new(state.db.clone());
    let orders = repo.orders_created_between(&tenant, start, end).await?;

    // Optional sub-aggregate: if it fails the report still goes out
    let top_items = match repo.served_orders_between(&tenant, start, end).await {
        Ok(served) => fold_top_items(&served, DEFAULT_TOP_ITEMS),
        Err(e) => {
            tracing::warn!(error = %e, "Top items aggregation failed, omitting from report");
            Vec::new()
        }
    };

    Ok(ApiResponse::success(
        StatusCode::OK,
        Some(MonthlyReport {
            year,
            month,
            metrics: fold_metrics(&orders),
            top_items,
        }),
        "Monthly sales report fetched successfully",
    ))
}

// ── GET /api/analytics/top-items ──

pub async fn top_items(
    State(state): State<ServerState>,
    Extension(acting): Extension<ActingTenant>,
    Query(query): Query<TopItemsQuery>,
) -> Result<ApiResponse<TopItemsReport>, AppError> {
    let tenant = tenant_record(&acting)?;

    let days = query.days.unwrap_or(DEFAULT_WINDOW_DAYS).clamp(1, 365);
    let limit = query.limit.unwrap_or(DEFAULT_TOP_ITEMS).clamp(1, 100);

    let end = Utc::now().timestamp_millis();
    let start = end - days * 86_400_000;

    let served = AnalyticsRepository::new(state.db.clone())
        .served_orders_between(&tenant, start, end)
        .await?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        Some(TopItemsReport {
            period: format!("Last {days} days"),
            items: fold_top_items(&served, limit),
        }),
        "Top items fetched successfully",
    ))
}

// ── Window helpers ──

/// Inclusive millisecond range covering one UTC day; ends 1ms before the
/// next midnight so adjacent windows never share an instant
fn day_window(date: NaiveDate) -> Result<(i64, i64), AppError> {
    let start = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| AppError::validation("Invalid date"))?
        .and_utc()
        .timestamp_millis();
    let end = date
        .succ_opt()
        .ok_or_else(|| AppError::validation("Invalid date"))?
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| AppError::validation("Invalid date"))?
        .and_utc()
        .timestamp_millis()
        - 1;
    Ok((start, end))
}

fn month_window(year: i32, month: u32) -> Result<(i64, i64), AppError> {
    let start_date = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::validation("Invalid year or month"))?;
    let end_date = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| AppError::validation("Invalid year or month"))?;

    let start = start_date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| AppError::validation("Invalid year or month"))?
        .and_utc()
        .timestamp_millis();
    let end = end_date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| AppError::validation("Invalid year or month"))?
        .and_utc()
        .timestamp_millis()
        - 1;
    Ok((start, end))
}
