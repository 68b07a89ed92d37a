use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use kardex_core::repository::{
    BoxError, TransactionFilter, TransactionRecord, TransactionRepository,
};

use crate::rows::TransactionRecordRow;

pub struct StoreTransactionRepository {
    pool: PgPool,
}

impl StoreTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const TX_COLUMNS: &str = "t.id, t.item_id, t.transaction_type, t.quantity, \
     t.previous_stock, t.new_stock, t.reason, t.created_by, t.created_at";

#[async_trait]
impl TransactionRepository for StoreTransactionRepository {
    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<TransactionRecord>, BoxError> {
        let type_text = filter.transaction_type.map(|t| t.as_str());
        let pattern = filter.search.as_ref().map(|s| format!("%{}%", s));

        let rows = sqlx::query_as::<_, TransactionRecordRow>(&format!(
            "SELECT {TX_COLUMNS}, u.display_name AS created_by_name, \
                    i.item_name, i.item_brand, i.size \
             FROM stock_transactions t \
             JOIN inventory_items i ON i.id = t.item_id \
             JOIN users u ON u.id = t.created_by \
             WHERE ($1::uuid IS NULL OR t.item_id = $1) \
               AND ($2::text IS NULL OR t.transaction_type = $2) \
               AND ($3::text IS NULL OR i.item_name ILIKE $3 OR i.item_brand ILIKE $3 \
                    OR t.reason ILIKE $3) \
             ORDER BY t.created_at DESC"
        ))
        .bind(filter.item_id)
        .bind(type_text)
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(TransactionRecordRow::into_domain)
            .collect()
    }

    async fn list_item_transactions(
        &self,
        item_id: Uuid,
    ) -> Result<Vec<TransactionRecord>, BoxError> {
        let rows = sqlx::query_as::<_, TransactionRecordRow>(&format!(
            "SELECT {TX_COLUMNS}, u.display_name AS created_by_name, \
                    i.item_name, i.item_brand, i.size \
             FROM stock_transactions t \
             JOIN inventory_items i ON i.id = t.item_id \
             JOIN users u ON u.id = t.created_by \
             WHERE t.item_id = $1 \
             ORDER BY t.created_at DESC"
        ))
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(TransactionRecordRow::into_domain)
            .collect()
    }
}
