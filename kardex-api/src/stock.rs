use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use kardex_core::stock::StockDirection;
use kardex_core::StockTransaction;

use crate::error::AppError;
use crate::middleware::auth::StaffClaims;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateStockRequest {
    pub direction: StockDirection,
    pub quantity: i32,
    pub reason: Option<String>,
    /// Stock-out against a specific active reservation: the withdrawal
    /// may draw the held quantity, and the hold is released.
    pub reservation_id: Option<Uuid>,
}

/// POST /v1/items/{id}/stock
///
/// The stock reconciliation action. Validation, the movement, the
/// ledger entry, and any reservation release happen in one database
/// transaction; a rejected movement leaves no partial writes behind.
pub async fn update_stock(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Extension(claims): Extension<StaffClaims>,
    Json(req): Json<UpdateStockRequest>,
) -> Result<Json<StockTransaction>, AppError> {
    let reason = req.reason.as_deref().filter(|r| !r.trim().is_empty());

    let recorded = state
        .items
        .apply_stock_update(
            item_id,
            req.direction,
            req.quantity,
            reason,
            req.reservation_id,
            claims.actor()?,
        )
        .await
        .map_err(AppError::from_repo)?;

    Ok(Json(recorded))
}
