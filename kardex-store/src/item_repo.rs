use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use kardex_core::repository::{
    BoxError, DashboardSummary, ItemRecord, ItemRepository, Page, Paginated,
};
use kardex_core::stock::{plan_stock_update, StockDirection, StockError};
use kardex_core::transaction::{StockTransaction, TransactionType};
use kardex_core::{InventoryItem, NewItem};

use crate::rows::{ItemRecordRow, ItemRow, ReservationRow, TransactionRow};

pub struct StoreItemRepository {
    pool: PgPool,
}

impl StoreItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SummaryRow {
    total_items: i64,
    total_stock: i64,
    low_stock_items: i64,
    active_reservations: i64,
    recent_transactions: i64,
}

const ITEM_COLUMNS: &str = "i.id, i.item_name, i.item_brand, i.size, i.stock_qty, \
     i.reserved_quantity, i.low_stock_warning, i.remark, i.created_by, i.updated_by, \
     i.created_at, i.updated_at";

#[async_trait]
impl ItemRepository for StoreItemRepository {
    async fn create_item(&self, new: &NewItem, actor: Uuid) -> Result<InventoryItem, BoxError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            INSERT INTO inventory_items
                (item_name, item_brand, size, stock_qty, low_stock_warning, remark,
                 created_by, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING id, item_name, item_brand, size, stock_qty, reserved_quantity,
                      low_stock_warning, remark, created_by, updated_by, created_at, updated_at
            "#,
        )
        .bind(&new.item_name)
        .bind(&new.item_brand)
        .bind(&new.size)
        .bind(new.stock_qty)
        .bind(new.low_stock_warning)
        .bind(&new.remark)
        .bind(actor)
        .fetch_one(&mut *tx)
        .await?;

        // Opening stock is itself a ledger entry.
        if new.stock_qty > 0 {
            sqlx::query(
                r#"
                INSERT INTO stock_transactions
                    (item_id, transaction_type, quantity, previous_stock, new_stock,
                     reason, created_by)
                VALUES ($1, 'IN', $2, 0, $2, 'Initial stock', $3)
                "#,
            )
            .bind(row.id)
            .bind(new.stock_qty)
            .bind(actor)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(row.into_domain())
    }

    async fn get_item(&self, id: Uuid) -> Result<Option<InventoryItem>, BoxError> {
        let row = sqlx::query_as::<_, ItemRow>(
            "SELECT id, item_name, item_brand, size, stock_qty, reserved_quantity, \
             low_stock_warning, remark, created_by, updated_by, created_at, updated_at \
             FROM inventory_items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ItemRow::into_domain))
    }

    async fn list_items(
        &self,
        search: Option<&str>,
        page: Page,
    ) -> Result<Paginated<ItemRecord>, BoxError> {
        let pattern = search.map(|s| format!("%{}%", s));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM inventory_items i \
             WHERE ($1::text IS NULL OR i.item_name ILIKE $1 OR i.item_brand ILIKE $1 \
                    OR i.size ILIKE $1 OR i.remark ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ItemRecordRow>(&format!(
            "SELECT {ITEM_COLUMNS}, cu.display_name AS created_by_name, \
                    uu.display_name AS updated_by_name \
             FROM inventory_items i \
             JOIN users cu ON cu.id = i.created_by \
             JOIN users uu ON uu.id = i.updated_by \
             WHERE ($1::text IS NULL OR i.item_name ILIKE $1 OR i.item_brand ILIKE $1 \
                    OR i.size ILIKE $1 OR i.remark ILIKE $1) \
             ORDER BY i.created_at DESC \
             LIMIT $2 OFFSET $3"
        ))
        .bind(&pattern)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Paginated {
            rows: rows.into_iter().map(ItemRecordRow::into_domain).collect(),
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    async fn list_low_stock(&self) -> Result<Vec<ItemRecord>, BoxError> {
        let rows = sqlx::query_as::<_, ItemRecordRow>(&format!(
            "SELECT {ITEM_COLUMNS}, cu.display_name AS created_by_name, \
                    uu.display_name AS updated_by_name \
             FROM inventory_items i \
             JOIN users cu ON cu.id = i.created_by \
             JOIN users uu ON uu.id = i.updated_by \
             WHERE i.stock_qty <= i.low_stock_warning \
             ORDER BY i.stock_qty ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ItemRecordRow::into_domain).collect())
    }

    async fn delete_item(&self, id: Uuid) -> Result<bool, BoxError> {
        let mut tx = self.pool.begin().await?;

        // Children first, foreign keys point at the item.
        sqlx::query("DELETE FROM reservations WHERE item_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM stock_transactions WHERE item_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM inventory_items WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(deleted.rows_affected() > 0)
    }

    async fn apply_stock_update(
        &self,
        item_id: Uuid,
        direction: StockDirection,
        quantity: i32,
        reason: Option<&str>,
        reservation_id: Option<Uuid>,
        actor: Uuid,
    ) -> Result<StockTransaction, BoxError> {
        let mut tx = self.pool.begin().await?;

        // Lock the item row so concurrent movements serialize instead of
        // both reading the same stale stock.
        let item = sqlx::query_as::<_, ItemRow>(
            "SELECT id, item_name, item_brand, size, stock_qty, reserved_quantity, \
             low_stock_warning, remark, created_by, updated_by, created_at, updated_at \
             FROM inventory_items WHERE id = $1 FOR UPDATE",
        )
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StockError::ItemNotFound(item_id))?;

        let reservation = match reservation_id {
            Some(res_id) => {
                let row = sqlx::query_as::<_, ReservationRow>(
                    "SELECT id, item_id, party_name, party_contact, party_address, \
                     reserved_quantity, reserved_until, notes, status, created_by, \
                     created_at, updated_at \
                     FROM reservations WHERE id = $1 FOR UPDATE",
                )
                .bind(res_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(StockError::ReservationInvalid)?;
                Some(row.into_domain()?)
            }
            None => None,
        };

        let plan = plan_stock_update(
            item_id,
            item.stock_qty,
            item.reserved_quantity,
            direction,
            quantity,
            reservation.as_ref(),
        )?;

        sqlx::query(
            "UPDATE inventory_items \
             SET stock_qty = $1, reserved_quantity = $2, updated_by = $3, updated_at = now() \
             WHERE id = $4",
        )
        .bind(plan.new_stock)
        .bind(plan.new_reserved)
        .bind(actor)
        .bind(item_id)
        .execute(&mut *tx)
        .await?;

        let transaction_type = match direction {
            StockDirection::In => TransactionType::In,
            StockDirection::Out => TransactionType::Out,
        };

        let recorded = sqlx::query_as::<_, TransactionRow>(
            r#"
            INSERT INTO stock_transactions
                (item_id, transaction_type, quantity, previous_stock, new_stock,
                 reason, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, item_id, transaction_type, quantity, previous_stock,
                      new_stock, reason, created_by, created_at
            "#,
        )
        .bind(item_id)
        .bind(transaction_type.as_str())
        .bind(quantity)
        .bind(plan.previous_stock)
        .bind(plan.new_stock)
        .bind(reason)
        .bind(actor)
        .fetch_one(&mut *tx)
        .await?;

        // A satisfied hold leaves the table; its quantity already came
        // off the aggregate above.
        if let Some(release) = plan.release {
            sqlx::query("DELETE FROM reservations WHERE id = $1")
                .bind(release.reservation_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        recorded.into_domain()
    }

    async fn dashboard_summary(&self, recent_days: i64) -> Result<DashboardSummary, BoxError> {
        let row = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM inventory_items) AS total_items,
                (SELECT COALESCE(SUM(stock_qty), 0)::BIGINT FROM inventory_items) AS total_stock,
                (SELECT COUNT(*) FROM inventory_items
                    WHERE stock_qty <= low_stock_warning) AS low_stock_items,
                (SELECT COUNT(*) FROM reservations WHERE status = 'ACTIVE') AS active_reservations,
                (SELECT COUNT(*) FROM stock_transactions
                    WHERE created_at >= now() - make_interval(days => $1)) AS recent_transactions
            "#,
        )
        .bind(recent_days as i32)
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardSummary {
            total_items: row.total_items,
            total_stock: row.total_stock,
            low_stock_items: row.low_stock_items,
            active_reservations: row.active_reservations,
            recent_transactions: row.recent_transactions,
        })
    }
}
