pub mod item;
pub mod repository;
pub mod reservation;
pub mod stock;
pub mod transaction;
pub mod user;

pub use item::{InventoryItem, ItemValidationError, NewItem};
pub use reservation::{NewReservation, Reservation, ReservationError, ReservationStatus};
pub use stock::{plan_stock_update, ReservationRelease, StockDirection, StockError, StockPlan};
pub use transaction::{StockTransaction, TransactionType};
pub use user::User;
