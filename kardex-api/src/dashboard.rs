use axum::{extract::State, Json};

use kardex_core::repository::DashboardSummary;

use crate::error::AppError;
use crate::state::AppState;

/// GET /v1/dashboard/summary
pub async fn summary(State(state): State<AppState>) -> Result<Json<DashboardSummary>, AppError> {
    let summary = state
        .items
        .dashboard_summary(state.business_rules.recent_transactions_days)
        .await
        .map_err(AppError::from_repo)?;

    Ok(Json(summary))
}
