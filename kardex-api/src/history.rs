use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use kardex_core::repository::{TransactionFilter, TransactionRecord};
use kardex_core::TransactionType;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Restrict to one item.
    pub item: Option<Uuid>,
    /// "IN" or "OUT"; "all" and absence mean both.
    pub r#type: Option<String>,
    /// Matches item name, brand, or the movement reason.
    pub search: Option<String>,
}

/// GET /v1/transactions
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<Vec<TransactionRecord>>, AppError> {
    let transaction_type = match query.r#type.as_deref() {
        None | Some("all") => None,
        Some(s) => Some(
            TransactionType::parse(s)
                .ok_or_else(|| AppError::Validation(format!("Unknown transaction type: {}", s)))?,
        ),
    };

    let filter = TransactionFilter {
        item_id: query.item,
        transaction_type,
        search: query.search.filter(|s| !s.trim().is_empty()),
    };

    let transactions = state
        .transactions
        .list_transactions(&filter)
        .await
        .map_err(AppError::from_repo)?;

    Ok(Json(transactions))
}

/// GET /v1/items/{id}/transactions
pub async fn list_item_transactions(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<Vec<TransactionRecord>>, AppError> {
    // 404 for a missing item rather than an empty history.
    state
        .items
        .get_item(item_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

    let transactions = state
        .transactions
        .list_item_transactions(item_id)
        .await
        .map_err(AppError::from_repo)?;

    Ok(Json(transactions))
}
