use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use kardex_core::repository::{
    BoxError, Page, Paginated, ReservationRecord, ReservationRepository,
};
use kardex_core::reservation::{
    NewReservation, Reservation, ReservationError, ReservationStatus,
};

use crate::rows::{ReservationRecordRow, ReservationRow};

pub struct StoreReservationRepository {
    pool: PgPool,
}

impl StoreReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const RESERVATION_COLUMNS: &str = "r.id, r.item_id, r.party_name, r.party_contact, \
     r.party_address, r.reserved_quantity, r.reserved_until, r.notes, r.status, \
     r.created_by, r.created_at, r.updated_at";

#[derive(sqlx::FromRow)]
struct ItemQuantities {
    stock_qty: i32,
    reserved_quantity: i32,
}

#[async_trait]
impl ReservationRepository for StoreReservationRepository {
    async fn create_reservation(
        &self,
        new: &NewReservation,
        actor: Uuid,
    ) -> Result<Reservation, BoxError> {
        new.validate()?;

        let mut tx = self.pool.begin().await?;

        // Lock the item so the availability check and the aggregate bump
        // see the same quantities.
        let item = sqlx::query_as::<_, ItemQuantities>(
            "SELECT stock_qty, reserved_quantity FROM inventory_items WHERE id = $1 FOR UPDATE",
        )
        .bind(new.item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ReservationError::ItemNotFound(new.item_id))?;

        let available = item.stock_qty - item.reserved_quantity;
        if new.reserved_quantity > available {
            return Err(ReservationError::InsufficientAvailable {
                requested: new.reserved_quantity,
                available,
            }
            .into());
        }

        let row = sqlx::query_as::<_, ReservationRow>(
            r#"
            INSERT INTO reservations
                (item_id, party_name, party_contact, party_address, reserved_quantity,
                 reserved_until, notes, status, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'ACTIVE', $8)
            RETURNING id, item_id, party_name, party_contact, party_address,
                      reserved_quantity, reserved_until, notes, status, created_by,
                      created_at, updated_at
            "#,
        )
        .bind(new.item_id)
        .bind(&new.party_name)
        .bind(&new.party_contact)
        .bind(&new.party_address)
        .bind(new.reserved_quantity)
        .bind(new.reserved_until)
        .bind(&new.notes)
        .bind(actor)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE inventory_items \
             SET reserved_quantity = reserved_quantity + $1, updated_at = now() \
             WHERE id = $2",
        )
        .bind(new.reserved_quantity)
        .bind(new.item_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        row.into_domain()
    }

    async fn list_reservations(
        &self,
        status: Option<ReservationStatus>,
        page: Page,
    ) -> Result<Paginated<ReservationRecord>, BoxError> {
        let status_text = status.map(|s| s.as_str());

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reservations r \
             WHERE ($1::text IS NULL OR r.status = $1)",
        )
        .bind(status_text)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ReservationRecordRow>(&format!(
            "SELECT {RESERVATION_COLUMNS}, u.display_name AS created_by_name, \
                    i.item_name, i.item_brand, i.size, i.stock_qty AS item_stock_qty \
             FROM reservations r \
             JOIN inventory_items i ON i.id = r.item_id \
             JOIN users u ON u.id = r.created_by \
             WHERE ($1::text IS NULL OR r.status = $1) \
             ORDER BY r.created_at DESC \
             LIMIT $2 OFFSET $3"
        ))
        .bind(status_text)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let rows = rows
            .into_iter()
            .map(ReservationRecordRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated {
            rows,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    async fn list_item_reservations(
        &self,
        item_id: Uuid,
    ) -> Result<Vec<ReservationRecord>, BoxError> {
        let rows = sqlx::query_as::<_, ReservationRecordRow>(&format!(
            "SELECT {RESERVATION_COLUMNS}, u.display_name AS created_by_name, \
                    i.item_name, i.item_brand, i.size, i.stock_qty AS item_stock_qty \
             FROM reservations r \
             JOIN inventory_items i ON i.id = r.item_id \
             JOIN users u ON u.id = r.created_by \
             WHERE r.item_id = $1 \
             ORDER BY r.created_at DESC"
        ))
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(ReservationRecordRow::into_domain)
            .collect()
    }

    async fn cancel_reservation(&self, id: Uuid) -> Result<Reservation, BoxError> {
        let mut tx = self.pool.begin().await?;

        // Learn the item first so locks are taken item-then-reservation,
        // the same order as the stock path.
        let item_id: Uuid = sqlx::query_scalar("SELECT item_id FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(ReservationError::NotFound(id))?;

        sqlx::query("SELECT id FROM inventory_items WHERE id = $1 FOR UPDATE")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, ReservationRow>(
            r#"
            SELECT id, item_id, party_name, party_contact, party_address,
                   reserved_quantity, reserved_until, notes, status, created_by,
                   created_at, updated_at
            FROM reservations WHERE id = $1 FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ReservationError::NotFound(id))?;

        let reservation = row.into_domain()?;
        if !reservation.is_active() {
            return Err(ReservationError::NotActive.into());
        }

        let updated = sqlx::query_as::<_, ReservationRow>(
            r#"
            UPDATE reservations SET status = 'CANCELLED', updated_at = now()
            WHERE id = $1
            RETURNING id, item_id, party_name, party_contact, party_address,
                      reserved_quantity, reserved_until, notes, status, created_by,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE inventory_items \
             SET reserved_quantity = GREATEST(0, reserved_quantity - $1), updated_at = now() \
             WHERE id = $2",
        )
        .bind(reservation.reserved_quantity)
        .bind(item_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        updated.into_domain()
    }

    async fn delete_reservation(&self, id: Uuid) -> Result<bool, BoxError> {
        let mut tx = self.pool.begin().await?;

        let item_id: Option<Uuid> =
            sqlx::query_scalar("SELECT item_id FROM reservations WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(item_id) = item_id else {
            return Ok(false);
        };

        sqlx::query("SELECT id FROM inventory_items WHERE id = $1 FOR UPDATE")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, ReservationRow>(
            r#"
            SELECT id, item_id, party_name, party_contact, party_address,
                   reserved_quantity, reserved_until, notes, status, created_by,
                   created_at, updated_at
            FROM reservations WHERE id = $1 FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(row) = row else {
            return Ok(false);
        };
        let reservation = row.into_domain()?;

        sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        // Only an active hold still counts against the aggregate.
        if reservation.is_active() {
            sqlx::query(
                "UPDATE inventory_items \
                 SET reserved_quantity = GREATEST(0, reserved_quantity - $1), updated_at = now() \
                 WHERE id = $2",
            )
            .bind(reservation.reserved_quantity)
            .bind(item_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn expire_due(&self, today: NaiveDate) -> Result<u64, BoxError> {
        // One statement: flip due holds and release their quantities
        // atomically, clamped at zero per item.
        let expired: i64 = sqlx::query_scalar(
            r#"
            WITH due AS (
                UPDATE reservations
                SET status = 'EXPIRED', updated_at = now()
                WHERE status = 'ACTIVE' AND reserved_until < $1
                RETURNING item_id, reserved_quantity
            ),
            totals AS (
                SELECT item_id, SUM(reserved_quantity)::INT AS released
                FROM due GROUP BY item_id
            ),
            bump AS (
                UPDATE inventory_items i
                SET reserved_quantity = GREATEST(0, i.reserved_quantity - t.released),
                    updated_at = now()
                FROM totals t
                WHERE i.id = t.item_id
                RETURNING i.id
            )
            SELECT COUNT(*) FROM due
            "#,
        )
        .bind(today)
        .fetch_one(&self.pool)
        .await?;

        Ok(expired as u64)
    }
}
