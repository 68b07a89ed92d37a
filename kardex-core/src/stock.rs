use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reservation::Reservation;

/// Direction of a requested stock movement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockDirection {
    In,
    Out,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StockError {
    #[error("Item not found: {0}")]
    ItemNotFound(Uuid),

    #[error("Quantity must be greater than 0")]
    InvalidQuantity,

    #[error("Insufficient available stock: requested {requested}, available {available}")]
    InsufficientAvailable { requested: i32, available: i32 },

    #[error("Invalid or inactive reservation")]
    ReservationInvalid,
}

/// The reservation to be satisfied by an accepted stock-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationRelease {
    pub reservation_id: Uuid,
    pub quantity: i32,
}

/// The writes an accepted movement implies. Produced by
/// [`plan_stock_update`] before anything is touched, applied by the
/// store inside a single transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockPlan {
    pub previous_stock: i32,
    pub new_stock: i32,
    pub new_reserved: i32,
    pub release: Option<ReservationRelease>,
}

/// Decide what a stock movement does to an item, or reject it.
///
/// Rules:
/// - stock-in adds `quantity` to stock;
/// - stock-out without a reservation may only draw from unreserved
///   stock (`stock - reserved`);
/// - stock-out against an active reservation belonging to the item may
///   additionally draw that party's hold; the plan then releases the
///   reservation and drops the aggregate by its amount, clamped at
///   zero.
///
/// Accepted plans always satisfy `new_stock >= 0` and
/// `new_reserved <= new_stock`.
pub fn plan_stock_update(
    item_id: Uuid,
    stock_qty: i32,
    reserved_quantity: i32,
    direction: StockDirection,
    quantity: i32,
    reservation: Option<&Reservation>,
) -> Result<StockPlan, StockError> {
    if quantity <= 0 {
        return Err(StockError::InvalidQuantity);
    }

    match direction {
        StockDirection::In => Ok(StockPlan {
            previous_stock: stock_qty,
            new_stock: stock_qty + quantity,
            new_reserved: reserved_quantity,
            release: None,
        }),
        StockDirection::Out => {
            let available = stock_qty - reserved_quantity;

            match reservation {
                None => {
                    if quantity > available {
                        return Err(StockError::InsufficientAvailable {
                            requested: quantity,
                            available,
                        });
                    }
                    Ok(StockPlan {
                        previous_stock: stock_qty,
                        new_stock: stock_qty - quantity,
                        new_reserved: reserved_quantity,
                        release: None,
                    })
                }
                Some(res) => {
                    if res.item_id != item_id || !res.is_active() {
                        return Err(StockError::ReservationInvalid);
                    }

                    // Unreserved stock plus this party's own hold. A
                    // drifted aggregate can put that sum above the
                    // physical stock, which stays the hard ceiling.
                    let permitted = (available + res.reserved_quantity).min(stock_qty);
                    if quantity > permitted {
                        return Err(StockError::InsufficientAvailable {
                            requested: quantity,
                            available: permitted,
                        });
                    }

                    let new_reserved = (reserved_quantity - res.reserved_quantity).max(0);
                    Ok(StockPlan {
                        previous_stock: stock_qty,
                        new_stock: stock_qty - quantity,
                        new_reserved,
                        release: Some(ReservationRelease {
                            reservation_id: res.id,
                            quantity: res.reserved_quantity,
                        }),
                    })
                }
            }
        }
    }
}
