//! Row structs for type-safe querying, mapped into domain types at the
//! repository boundary.

use uuid::Uuid;

use kardex_core::repository::{
    BoxError, ItemRecord, ReservationRecord, TransactionRecord,
};
use kardex_core::reservation::{Reservation, ReservationStatus};
use kardex_core::transaction::{StockTransaction, TransactionType};
use kardex_core::{InventoryItem, User};

#[derive(sqlx::FromRow)]
pub(crate) struct ItemRow {
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
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl ItemRow {
    pub(crate) fn into_domain(self) -> InventoryItem {
        InventoryItem {
            id: self.id,
            item_name: self.item_name,
            item_brand: self.item_brand,
            size: self.size,
            stock_qty: self.stock_qty,
            reserved_quantity: self.reserved_quantity,
            low_stock_warning: self.low_stock_warning,
            remark: self.remark,
            created_by: self.created_by,
            updated_by: self.updated_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ItemRecordRow {
    #[sqlx(flatten)]
    pub item: ItemRow,
    pub created_by_name: String,
    pub updated_by_name: String,
}

impl ItemRecordRow {
    pub(crate) fn into_domain(self) -> ItemRecord {
        ItemRecord {
            item: self.item.into_domain(),
            created_by_name: self.created_by_name,
            updated_by_name: self.updated_by_name,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct TransactionRow {
    pub id: Uuid,
    pub item_id: Uuid,
    pub transaction_type: String,
    pub quantity: i32,
    pub previous_stock: i32,
    pub new_stock: i32,
    pub reason: Option<String>,
    pub created_by: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl TransactionRow {
    pub(crate) fn into_domain(self) -> Result<StockTransaction, BoxError> {
        let transaction_type = TransactionType::parse(&self.transaction_type)
            .ok_or("Unknown transaction type in stock_transactions")?;
        Ok(StockTransaction {
            id: self.id,
            item_id: self.item_id,
            transaction_type,
            quantity: self.quantity,
            previous_stock: self.previous_stock,
            new_stock: self.new_stock,
            reason: self.reason,
            created_by: self.created_by,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct TransactionRecordRow {
    #[sqlx(flatten)]
    pub transaction: TransactionRow,
    pub created_by_name: String,
    pub item_name: String,
    pub item_brand: String,
    pub size: String,
}

impl TransactionRecordRow {
    pub(crate) fn into_domain(self) -> Result<TransactionRecord, BoxError> {
        Ok(TransactionRecord {
            transaction: self.transaction.into_domain()?,
            created_by_name: self.created_by_name,
            item_name: self.item_name,
            item_brand: self.item_brand,
            size: self.size,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ReservationRow {
    pub id: Uuid,
    pub item_id: Uuid,
    pub party_name: String,
    pub party_contact: Option<String>,
    pub party_address: Option<String>,
    pub reserved_quantity: i32,
    pub reserved_until: chrono::NaiveDate,
    pub notes: Option<String>,
    pub status: String,
    pub created_by: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl ReservationRow {
    pub(crate) fn into_domain(self) -> Result<Reservation, BoxError> {
        let status = ReservationStatus::parse(&self.status)
            .ok_or("Unknown reservation status in reservations")?;
        Ok(Reservation {
            id: self.id,
            item_id: self.item_id,
            party_name: self.party_name,
            party_contact: self.party_contact,
            party_address: self.party_address,
            reserved_quantity: self.reserved_quantity,
            reserved_until: self.reserved_until,
            notes: self.notes,
            status,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ReservationRecordRow {
    #[sqlx(flatten)]
    pub reservation: ReservationRow,
    pub created_by_name: String,
    pub item_name: String,
    pub item_brand: String,
    pub size: String,
    pub item_stock_qty: i32,
}

impl ReservationRecordRow {
    pub(crate) fn into_domain(self) -> Result<ReservationRecord, BoxError> {
        Ok(ReservationRecord {
            reservation: self.reservation.into_domain()?,
            created_by_name: self.created_by_name,
            item_name: self.item_name,
            item_brand: self.item_brand,
            size: self.size,
            stock_qty: self.item_stock_qty,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl UserRow {
    pub(crate) fn into_domain(self) -> User {
        User {
            id: self.id,
            email: self.email,
            display_name: self.display_name,
            password_hash: self.password_hash,
            created_at: self.created_at,
        }
    }
}
