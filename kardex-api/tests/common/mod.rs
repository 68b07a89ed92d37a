//! In-memory repository fakes and request helpers for router tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use argon2::password_hash::{PasswordHasher as _, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use chrono::{NaiveDate, Utc};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use tower::ServiceExt;
use uuid::Uuid;

use kardex_api::middleware::auth::StaffClaims;
use kardex_api::state::{AppState, AuthSettings};
use kardex_core::repository::{
    BoxError, DashboardSummary, ItemRecord, ItemRepository, Page, Paginated, ReservationRecord,
    ReservationRepository, TransactionFilter, TransactionRecord, TransactionRepository,
    UserRepository,
};
use kardex_core::reservation::{NewReservation, Reservation, ReservationError, ReservationStatus};
use kardex_core::stock::{plan_stock_update, StockDirection, StockError};
use kardex_core::transaction::{StockTransaction, TransactionType};
use kardex_core::{InventoryItem, NewItem, User};
use kardex_store::app_config::BusinessRules;

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_PASSWORD: &str = "correct horse";

#[derive(Default)]
pub struct MemoryStore {
    pub items: Mutex<HashMap<Uuid, InventoryItem>>,
    pub transactions: Mutex<Vec<StockTransaction>>,
    pub reservations: Mutex<HashMap<Uuid, Reservation>>,
    pub users: Mutex<Vec<User>>,
}

impl MemoryStore {
    fn display_name(&self, id: Uuid) -> String {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.display_name.clone())
            .unwrap_or_else(|| "unknown".to_string())
    }

    fn item_record(&self, item: &InventoryItem) -> ItemRecord {
        ItemRecord {
            item: item.clone(),
            created_by_name: self.display_name(item.created_by),
            updated_by_name: self.display_name(item.updated_by),
        }
    }

    fn transaction_record(&self, tx: &StockTransaction) -> TransactionRecord {
        let items = self.items.lock().unwrap();
        let item = items.get(&tx.item_id);
        TransactionRecord {
            transaction: tx.clone(),
            created_by_name: self.display_name(tx.created_by),
            item_name: item.map(|i| i.item_name.clone()).unwrap_or_default(),
            item_brand: item.map(|i| i.item_brand.clone()).unwrap_or_default(),
            size: item.map(|i| i.size.clone()).unwrap_or_default(),
        }
    }

    fn reservation_record(&self, res: &Reservation) -> ReservationRecord {
        let items = self.items.lock().unwrap();
        let item = items.get(&res.item_id);
        ReservationRecord {
            reservation: res.clone(),
            created_by_name: self.display_name(res.created_by),
            item_name: item.map(|i| i.item_name.clone()).unwrap_or_default(),
            item_brand: item.map(|i| i.item_brand.clone()).unwrap_or_default(),
            size: item.map(|i| i.size.clone()).unwrap_or_default(),
            stock_qty: item.map(|i| i.stock_qty).unwrap_or_default(),
        }
    }
}

#[async_trait]
impl ItemRepository for MemoryStore {
    async fn create_item(&self, new: &NewItem, actor: Uuid) -> Result<InventoryItem, BoxError> {
        let now = Utc::now();
        let item = InventoryItem {
            id: Uuid::new_v4(),
            item_name: new.item_name.clone(),
            item_brand: new.item_brand.clone(),
            size: new.size.clone(),
            stock_qty: new.stock_qty,
            reserved_quantity: 0,
            low_stock_warning: new.low_stock_warning,
            remark: new.remark.clone(),
            created_by: actor,
            updated_by: actor,
            created_at: now,
            updated_at: now,
        };

        if new.stock_qty > 0 {
            self.transactions.lock().unwrap().push(StockTransaction {
                id: Uuid::new_v4(),
                item_id: item.id,
                transaction_type: TransactionType::In,
                quantity: new.stock_qty,
                previous_stock: 0,
                new_stock: new.stock_qty,
                reason: Some("Initial stock".to_string()),
                created_by: actor,
                created_at: now,
            });
        }

        self.items.lock().unwrap().insert(item.id, item.clone());
        Ok(item)
    }

    async fn get_item(&self, id: Uuid) -> Result<Option<InventoryItem>, BoxError> {
        Ok(self.items.lock().unwrap().get(&id).cloned())
    }

    async fn list_items(
        &self,
        search: Option<&str>,
        page: Page,
    ) -> Result<Paginated<ItemRecord>, BoxError> {
        let mut matched: Vec<InventoryItem> = self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|i| match search {
                None => true,
                Some(s) => {
                    let s = s.to_lowercase();
                    i.item_name.to_lowercase().contains(&s)
                        || i.item_brand.to_lowercase().contains(&s)
                        || i.size.to_lowercase().contains(&s)
                        || i.remark
                            .as_ref()
                            .is_some_and(|r| r.to_lowercase().contains(&s))
                }
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matched.len() as i64;
        let rows = matched
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .map(|i| self.item_record(&i))
            .collect();

        Ok(Paginated {
            rows,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    async fn list_low_stock(&self) -> Result<Vec<ItemRecord>, BoxError> {
        let mut low: Vec<InventoryItem> = self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|i| i.is_low_stock())
            .cloned()
            .collect();
        low.sort_by_key(|i| i.stock_qty);
        Ok(low.iter().map(|i| self.item_record(i)).collect())
    }

    async fn delete_item(&self, id: Uuid) -> Result<bool, BoxError> {
        let existed = self.items.lock().unwrap().remove(&id).is_some();
        if existed {
            self.reservations
                .lock()
                .unwrap()
                .retain(|_, r| r.item_id != id);
            self.transactions
                .lock()
                .unwrap()
                .retain(|t| t.item_id != id);
        }
        Ok(existed)
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
        let mut items = self.items.lock().unwrap();
        let item = items
            .get_mut(&item_id)
            .ok_or(StockError::ItemNotFound(item_id))?;

        let mut reservations = self.reservations.lock().unwrap();
        let reservation = match reservation_id {
            Some(id) => Some(
                reservations
                    .get(&id)
                    .cloned()
                    .ok_or(StockError::ReservationInvalid)?,
            ),
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

        item.stock_qty = plan.new_stock;
        item.reserved_quantity = plan.new_reserved;
        item.updated_by = actor;
        item.updated_at = Utc::now();

        if let Some(release) = plan.release {
            reservations.remove(&release.reservation_id);
        }

        let recorded = StockTransaction {
            id: Uuid::new_v4(),
            item_id,
            transaction_type: match direction {
                StockDirection::In => TransactionType::In,
                StockDirection::Out => TransactionType::Out,
            },
            quantity,
            previous_stock: plan.previous_stock,
            new_stock: plan.new_stock,
            reason: reason.map(str::to_string),
            created_by: actor,
            created_at: Utc::now(),
        };
        self.transactions.lock().unwrap().push(recorded.clone());
        Ok(recorded)
    }

    async fn dashboard_summary(&self, _recent_days: i64) -> Result<DashboardSummary, BoxError> {
        let items = self.items.lock().unwrap();
        Ok(DashboardSummary {
            total_items: items.len() as i64,
            total_stock: items.values().map(|i| i.stock_qty as i64).sum(),
            low_stock_items: items.values().filter(|i| i.is_low_stock()).count() as i64,
            active_reservations: self
                .reservations
                .lock()
                .unwrap()
                .values()
                .filter(|r| r.is_active())
                .count() as i64,
            recent_transactions: self.transactions.lock().unwrap().len() as i64,
        })
    }
}

#[async_trait]
impl TransactionRepository for MemoryStore {
    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<TransactionRecord>, BoxError> {
        let mut txs: Vec<StockTransaction> = self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|t| filter.item_id.is_none_or(|id| t.item_id == id))
            .filter(|t| {
                filter
                    .transaction_type
                    .is_none_or(|ty| t.transaction_type == ty)
            })
            .cloned()
            .collect();
        txs.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let records: Vec<TransactionRecord> =
            txs.iter().map(|t| self.transaction_record(t)).collect();
        Ok(match &filter.search {
            None => records,
            Some(s) => {
                let s = s.to_lowercase();
                records
                    .into_iter()
                    .filter(|r| {
                        r.item_name.to_lowercase().contains(&s)
                            || r.item_brand.to_lowercase().contains(&s)
                            || r.transaction
                                .reason
                                .as_ref()
                                .is_some_and(|reason| reason.to_lowercase().contains(&s))
                    })
                    .collect()
            }
        })
    }

    async fn list_item_transactions(
        &self,
        item_id: Uuid,
    ) -> Result<Vec<TransactionRecord>, BoxError> {
        self.list_transactions(&TransactionFilter {
            item_id: Some(item_id),
            ..Default::default()
        })
        .await
    }
}

#[async_trait]
impl ReservationRepository for MemoryStore {
    async fn create_reservation(
        &self,
        new: &NewReservation,
        actor: Uuid,
    ) -> Result<Reservation, BoxError> {
        new.validate()?;

        let mut items = self.items.lock().unwrap();
        let item = items
            .get_mut(&new.item_id)
            .ok_or(ReservationError::ItemNotFound(new.item_id))?;

        let available = item.available_quantity();
        if new.reserved_quantity > available {
            return Err(ReservationError::InsufficientAvailable {
                requested: new.reserved_quantity,
                available,
            }
            .into());
        }

        let now = Utc::now();
        let reservation = Reservation {
            id: Uuid::new_v4(),
            item_id: new.item_id,
            party_name: new.party_name.clone(),
            party_contact: new.party_contact.clone(),
            party_address: new.party_address.clone(),
            reserved_quantity: new.reserved_quantity,
            reserved_until: new.reserved_until,
            notes: new.notes.clone(),
            status: ReservationStatus::Active,
            created_by: actor,
            created_at: now,
            updated_at: now,
        };

        item.reserved_quantity += new.reserved_quantity;
        self.reservations
            .lock()
            .unwrap()
            .insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn list_reservations(
        &self,
        status: Option<ReservationStatus>,
        page: Page,
    ) -> Result<Paginated<ReservationRecord>, BoxError> {
        let mut matched: Vec<Reservation> = self
            .reservations
            .lock()
            .unwrap()
            .values()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matched.len() as i64;
        let rows = matched
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .map(|r| self.reservation_record(&r))
            .collect();

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
        let mut matched: Vec<Reservation> = self
            .reservations
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.item_id == item_id)
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matched.iter().map(|r| self.reservation_record(r)).collect())
    }

    async fn cancel_reservation(&self, id: Uuid) -> Result<Reservation, BoxError> {
        let mut reservations = self.reservations.lock().unwrap();
        let reservation = reservations
            .get_mut(&id)
            .ok_or(ReservationError::NotFound(id))?;
        if !reservation.is_active() {
            return Err(ReservationError::NotActive.into());
        }

        reservation.status = ReservationStatus::Cancelled;
        reservation.updated_at = Utc::now();
        let released = reservation.reserved_quantity;
        let item_id = reservation.item_id;
        let updated = reservation.clone();

        if let Some(item) = self.items.lock().unwrap().get_mut(&item_id) {
            item.reserved_quantity = (item.reserved_quantity - released).max(0);
        }
        Ok(updated)
    }

    async fn delete_reservation(&self, id: Uuid) -> Result<bool, BoxError> {
        let removed = self.reservations.lock().unwrap().remove(&id);
        match removed {
            None => Ok(false),
            Some(res) => {
                if res.is_active() {
                    if let Some(item) = self.items.lock().unwrap().get_mut(&res.item_id) {
                        item.reserved_quantity =
                            (item.reserved_quantity - res.reserved_quantity).max(0);
                    }
                }
                Ok(true)
            }
        }
    }

    async fn expire_due(&self, today: NaiveDate) -> Result<u64, BoxError> {
        let mut reservations = self.reservations.lock().unwrap();
        let mut items = self.items.lock().unwrap();
        let mut expired = 0;

        for reservation in reservations.values_mut() {
            if reservation.is_due(today) {
                reservation.status = ReservationStatus::Expired;
                reservation.updated_at = Utc::now();
                if let Some(item) = items.get_mut(&reservation.item_id) {
                    item.reserved_quantity =
                        (item.reserved_quantity - reservation.reserved_quantity).max(0);
                }
                expired += 1;
            }
        }
        Ok(expired)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, BoxError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

// ============================================================================
// Test app assembly
// ============================================================================

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub user_id: Uuid,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::default());

    let salt = SaltString::encode_b64(b"kardex-test-salt").unwrap();
    let password_hash = Argon2::default()
        .hash_password(TEST_PASSWORD.as_bytes(), &salt)
        .unwrap()
        .to_string();

    let user_id = Uuid::new_v4();
    store.users.lock().unwrap().push(User {
        id: user_id,
        email: "clerk@example.com".to_string(),
        display_name: "Test Clerk".to_string(),
        password_hash,
        created_at: Utc::now(),
    });

    let state = AppState {
        items: store.clone(),
        transactions: store.clone(),
        reservations: store.clone(),
        users: store.clone(),
        auth: AuthSettings {
            secret: TEST_SECRET.to_string(),
            expiration: 3600,
        },
        business_rules: BusinessRules {
            low_stock_default: 5,
            items_per_page: 20,
            reservation_sweep_seconds: 300,
            recent_transactions_days: 7,
        },
    };

    TestApp {
        router: kardex_api::app(state),
        store,
        user_id,
    }
}

pub fn staff_token(user_id: Uuid) -> String {
    let claims = StaffClaims {
        sub: user_id.to_string(),
        email: "clerk@example.com".to_string(),
        name: "Test Clerk".to_string(),
        role: "STAFF".to_string(),
        exp: (Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

pub async fn request(
    app: &TestApp,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let token = staff_token(app.user_id);
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    read_json(response).await
}

pub async fn read_json(response: Response<Body>) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
