use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reservation status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Active,
    Fulfilled,
    Cancelled,
    Expired,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Active => "ACTIVE",
            ReservationStatus::Fulfilled => "FULFILLED",
            ReservationStatus::Cancelled => "CANCELLED",
            ReservationStatus::Expired => "EXPIRED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(ReservationStatus::Active),
            "FULFILLED" => Some(ReservationStatus::Fulfilled),
            "CANCELLED" => Some(ReservationStatus::Cancelled),
            "EXPIRED" => Some(ReservationStatus::Expired),
            _ => None,
        }
    }
}

/// A hold on a quantity of an item for a named party until a given date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub item_id: Uuid,
    pub party_name: String,
    pub party_contact: Option<String>,
    pub party_address: Option<String>,
    pub reserved_quantity: i32,
    pub reserved_until: NaiveDate,
    pub notes: Option<String>,
    pub status: ReservationStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Active
    }

    /// Whether the hold has outlived its `reserved_until` date.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.is_active() && self.reserved_until < today
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReservationError {
    #[error("Reservation not found: {0}")]
    NotFound(Uuid),

    #[error("Item not found: {0}")]
    ItemNotFound(Uuid),

    #[error("Only {available} units available for reservation")]
    InsufficientAvailable { requested: i32, available: i32 },

    #[error("Reserved quantity must be greater than 0")]
    InvalidQuantity,

    #[error("Party name is required")]
    MissingPartyName,

    #[error("Reservation is not active")]
    NotActive,
}

/// Validated payload for creating a reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReservation {
    pub item_id: Uuid,
    pub party_name: String,
    pub party_contact: Option<String>,
    pub party_address: Option<String>,
    pub reserved_quantity: i32,
    pub reserved_until: NaiveDate,
    pub notes: Option<String>,
}

impl NewReservation {
    /// Field checks; the availability check happens against the item row
    /// inside the store transaction.
    pub fn validate(&self) -> Result<(), ReservationError> {
        if self.party_name.trim().is_empty() {
            return Err(ReservationError::MissingPartyName);
        }
        if self.reserved_quantity <= 0 {
            return Err(ReservationError::InvalidQuantity);
        }
        Ok(())
    }
}
