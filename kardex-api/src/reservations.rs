use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use kardex_core::repository::{Page, Paginated, ReservationRecord};
use kardex_core::reservation::{NewReservation, Reservation, ReservationStatus};

use crate::error::AppError;
use crate::middleware::auth::StaffClaims;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub item_id: Uuid,
    pub party_name: String,
    pub party_contact: Option<String>,
    pub party_address: Option<String>,
    pub reserved_quantity: i32,
    pub reserved_until: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListReservationsQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/reservations
pub async fn create_reservation(
    State(state): State<AppState>,
    Extension(claims): Extension<StaffClaims>,
    Json(req): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<Reservation>), AppError> {
    let new = NewReservation {
        item_id: req.item_id,
        party_name: req.party_name,
        party_contact: req.party_contact.filter(|s| !s.trim().is_empty()),
        party_address: req.party_address.filter(|s| !s.trim().is_empty()),
        reserved_quantity: req.reserved_quantity,
        reserved_until: req.reserved_until,
        notes: req.notes.filter(|s| !s.trim().is_empty()),
    };

    let reservation = state
        .reservations
        .create_reservation(&new, claims.actor()?)
        .await
        .map_err(AppError::from_repo)?;

    Ok((StatusCode::CREATED, Json(reservation)))
}

/// GET /v1/reservations
pub async fn list_reservations(
    State(state): State<AppState>,
    Query(query): Query<ListReservationsQuery>,
) -> Result<Json<Paginated<ReservationRecord>>, AppError> {
    let status = match query.status.as_deref() {
        None | Some("all") => None,
        Some(s) => Some(ReservationStatus::parse(s).ok_or_else(|| {
            AppError::Validation(format!("Unknown reservation status: {}", s))
        })?),
    };

    let page = Page {
        page: query.page.unwrap_or(1).max(1),
        per_page: query
            .per_page
            .unwrap_or(state.business_rules.items_per_page)
            .clamp(1, 100),
    };

    let reservations = state
        .reservations
        .list_reservations(status, page)
        .await
        .map_err(AppError::from_repo)?;

    Ok(Json(reservations))
}

/// GET /v1/items/{id}/reservations
pub async fn list_item_reservations(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<Vec<ReservationRecord>>, AppError> {
    // 404 for a missing item rather than an empty list.
    state
        .items
        .get_item(item_id)
        .await
        .map_err(AppError::from_repo)?
        .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

    let reservations = state
        .reservations
        .list_item_reservations(item_id)
        .await
        .map_err(AppError::from_repo)?;

    Ok(Json(reservations))
}

/// POST /v1/reservations/{id}/cancel
pub async fn cancel_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Reservation>, AppError> {
    let reservation = state
        .reservations
        .cancel_reservation(id)
        .await
        .map_err(AppError::from_repo)?;

    Ok(Json(reservation))
}

/// DELETE /v1/reservations/{id}
pub async fn delete_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = state
        .reservations
        .delete_reservation(id)
        .await
        .map_err(AppError::from_repo)?;

    if !deleted {
        return Err(AppError::NotFound("Reservation not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
