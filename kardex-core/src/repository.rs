use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item::{InventoryItem, NewItem};
use crate::reservation::{NewReservation, Reservation, ReservationStatus};
use crate::stock::StockDirection;
use crate::transaction::{StockTransaction, TransactionType};
use crate::user::User;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Page request for listing endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub page: u32,
    pub per_page: u32,
}

impl Page {
    pub fn offset(&self) -> i64 {
        (self.page.saturating_sub(1) as i64) * self.per_page as i64
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub rows: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

/// Item together with the display names of the users who touched it.
/// Replaces the original backend's `inventory_items_with_users` view.
#[derive(Debug, Clone, Serialize)]
pub struct ItemRecord {
    #[serde(flatten)]
    pub item: InventoryItem,
    pub created_by_name: String,
    pub updated_by_name: String,
}

/// Transaction joined with its item and the acting user.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRecord {
    #[serde(flatten)]
    pub transaction: StockTransaction,
    pub created_by_name: String,
    pub item_name: String,
    pub item_brand: String,
    pub size: String,
}

/// Reservation joined with its item and the acting user.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationRecord {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub created_by_name: String,
    pub item_name: String,
    pub item_brand: String,
    pub size: String,
    pub stock_qty: i32,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub item_id: Option<Uuid>,
    pub transaction_type: Option<TransactionType>,
    /// Matches item name, brand, or the transaction reason.
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_items: i64,
    pub total_stock: i64,
    pub low_stock_items: i64,
    pub active_reservations: i64,
    pub recent_transactions: i64,
}

/// Inventory items plus the stock reconciliation action.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert the item; an initial stock greater than zero also appends
    /// an `IN` transaction in the same database transaction.
    async fn create_item(&self, new: &NewItem, actor: Uuid) -> Result<InventoryItem, BoxError>;

    async fn get_item(&self, id: Uuid) -> Result<Option<InventoryItem>, BoxError>;

    async fn list_items(
        &self,
        search: Option<&str>,
        page: Page,
    ) -> Result<Paginated<ItemRecord>, BoxError>;

    /// Items at or below their low-stock warning, lowest stock first.
    async fn list_low_stock(&self) -> Result<Vec<ItemRecord>, BoxError>;

    /// Delete the item and its transactions and reservations in one
    /// database transaction. Returns false when the item does not exist.
    async fn delete_item(&self, id: Uuid) -> Result<bool, BoxError>;

    /// Apply a stock movement atomically: lock the item row, plan the
    /// update, write the new quantities, append the ledger entry, and
    /// release a satisfied reservation. Domain failures surface as
    /// [`crate::stock::StockError`] through the boxed error.
    async fn apply_stock_update(
        &self,
        item_id: Uuid,
        direction: StockDirection,
        quantity: i32,
        reason: Option<&str>,
        reservation_id: Option<Uuid>,
        actor: Uuid,
    ) -> Result<StockTransaction, BoxError>;

    async fn dashboard_summary(&self, recent_days: i64) -> Result<DashboardSummary, BoxError>;
}

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<TransactionRecord>, BoxError>;

    async fn list_item_transactions(
        &self,
        item_id: Uuid,
    ) -> Result<Vec<TransactionRecord>, BoxError>;
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Create the hold and bump the item's aggregate reserved quantity
    /// in one database transaction. Domain failures surface as
    /// [`crate::reservation::ReservationError`] through the boxed error.
    async fn create_reservation(
        &self,
        new: &NewReservation,
        actor: Uuid,
    ) -> Result<Reservation, BoxError>;

    async fn list_reservations(
        &self,
        status: Option<ReservationStatus>,
        page: Page,
    ) -> Result<Paginated<ReservationRecord>, BoxError>;

    async fn list_item_reservations(
        &self,
        item_id: Uuid,
    ) -> Result<Vec<ReservationRecord>, BoxError>;

    /// `ACTIVE -> CANCELLED`, releasing the held quantity.
    async fn cancel_reservation(&self, id: Uuid) -> Result<Reservation, BoxError>;

    /// Remove the row outright; an active hold also releases its
    /// quantity. Returns false when the reservation does not exist.
    async fn delete_reservation(&self, id: Uuid) -> Result<bool, BoxError>;

    /// Flip active holds past their `reserved_until` date to `EXPIRED`
    /// and release their quantities. Returns the number expired.
    async fn expire_due(&self, today: NaiveDate) -> Result<u64, BoxError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, BoxError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_offsets_are_zero_based() {
        let first = Page { page: 1, per_page: 20 };
        assert_eq!(first.offset(), 0);
        assert_eq!(first.limit(), 20);

        let third = Page { page: 3, per_page: 20 };
        assert_eq!(third.offset(), 40);

        // Page 0 is treated as page 1 rather than underflowing.
        let zero = Page { page: 0, per_page: 20 };
        assert_eq!(zero.offset(), 0);
    }
}
