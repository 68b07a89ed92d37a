use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An inventory item as stored in `inventory_items`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub item_name: String,
    pub item_brand: String,
    pub size: String,
    pub stock_qty: i32,
    pub reserved_quantity: i32,
    pub low_stock_warning: i32,
    pub remark: Option<String>,
    pub created_by: Uuid,
    pub updated_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Stock not held by any reservation.
    pub fn available_quantity(&self) -> i32 {
        self.stock_qty - self.reserved_quantity
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock_qty <= self.low_stock_warning
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ItemValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Stock quantity cannot be negative")]
    NegativeStock,

    #[error("Low stock warning must be at least 1")]
    LowStockWarningTooSmall,
}

/// Validated payload for creating an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItem {
    pub item_name: String,
    pub item_brand: String,
    pub size: String,
    pub stock_qty: i32,
    pub low_stock_warning: i32,
    pub remark: Option<String>,
}

impl NewItem {
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.item_name.trim().is_empty() {
            return Err(ItemValidationError::MissingField("item_name"));
        }
        if self.item_brand.trim().is_empty() {
            return Err(ItemValidationError::MissingField("item_brand"));
        }
        if self.size.trim().is_empty() {
            return Err(ItemValidationError::MissingField("size"));
        }
        if self.stock_qty < 0 {
            return Err(ItemValidationError::NegativeStock);
        }
        if self.low_stock_warning < 1 {
            return Err(ItemValidationError::LowStockWarningTooSmall);
        }
        Ok(())
    }
}
