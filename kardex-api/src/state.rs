use std::sync::Arc;

use kardex_core::repository::{
    ItemRepository, ReservationRepository, TransactionRepository, UserRepository,
};
use kardex_store::app_config::BusinessRules;

#[derive(Clone)]
pub struct AuthSettings {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub items: Arc<dyn ItemRepository>,
    pub transactions: Arc<dyn TransactionRepository>,
    pub reservations: Arc<dyn ReservationRepository>,
    pub users: Arc<dyn UserRepository>,
    pub auth: AuthSettings,
    pub business_rules: BusinessRules,
}
