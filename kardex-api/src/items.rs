use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use kardex_core::repository::{ItemRecord, Page, Paginated};
use kardex_core::{InventoryItem, NewItem};

use crate::error::AppError;
use crate::middleware::auth::StaffClaims;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub item_name: String,
    pub item_brand: String,
    pub size: String,
    pub stock_qty: i32,
    /// Falls back to the configured default when omitted.
    pub low_stock_warning: Option<i32>,
    pub remark: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListItemsQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/items
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ListItemsQuery>,
) -> Result<Json<Paginated<ItemRecord>>, AppError> {
    let page = Page {
        page: query.page.unwrap_or(1).max(1),
        per_page: query
            .per_page
            .unwrap_or(state.business_rules.items_per_page)
            .clamp(1, 100),
    };

    let search = query.search.as_deref().filter(|s| !s.trim().is_empty());
    let items = state
        .items
        .list_items(search, page)
        .await
        .map_err(AppError::from_repo)?;

    Ok(Json(items))
}

/// POST /v1/items
pub async fn create_item(
    State(state): State<AppState>,
    Extension(claims): Extension<StaffClaims>,
    Json(req): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<InventoryItem>), AppError> {
    let new = NewItem {
        item_name: req.item_name,
        item_brand: req.item_brand,
        size: req.size,
        stock_qty: req.stock_qty,
        low_stock_warning: req
            .low_stock_warning
            .unwrap_or(state.business_rules.low_stock_default),
        remark: req.remark.filter(|r| !r.trim().is_empty()),
    };
    new.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let item = state
        .items
        .create_item(&new, claims.actor()?)
        .await
        .map_err(AppError::from_repo)?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /v1/items/{id}
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InventoryItem>, AppError> {
    let item = state
        .items
        .get_item(id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

    Ok(Json(item))
}

/// DELETE /v1/items/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = state
        .items
        .delete_item(id)
        .await
        .map_err(AppError::from_repo)?;

    if !deleted {
        return Err(AppError::NotFound("Item not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/low-stock
pub async fn list_low_stock(
    State(state): State<AppState>,
) -> Result<Json<Vec<ItemRecord>>, AppError> {
    let items = state
        .items
        .list_low_stock()
        .await
        .map_err(AppError::from_repo)?;

    Ok(Json(items))
}
