pub mod app_config;
pub mod database;
pub mod item_repo;
pub mod reservation_repo;
mod rows;
pub mod transaction_repo;
pub mod user_repo;

pub use app_config::Config;
pub use database::DbClient;
pub use item_repo::StoreItemRepository;
pub use reservation_repo::StoreReservationRepository;
pub use transaction_repo::StoreTransactionRepository;
pub use user_repo::StoreUserRepository;
