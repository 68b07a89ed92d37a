use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use kardex_core::item::ItemValidationError;
use kardex_core::repository::BoxError;
use kardex_core::reservation::ReservationError;
use kardex_core::stock::StockError;

#[derive(Debug)]
pub enum AppError {
    Unauthorized(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
    Anyhow(anyhow::Error),
}

impl AppError {
    /// Map a boxed repository error onto an HTTP failure. Typed domain
    /// errors travel through the box; anything else is a backend fault.
    pub fn from_repo(err: BoxError) -> AppError {
        let err = match err.downcast::<StockError>() {
            Ok(e) => {
                return match *e {
                    StockError::ItemNotFound(_) => AppError::NotFound(e.to_string()),
                    StockError::InvalidQuantity => AppError::Validation(e.to_string()),
                    StockError::InsufficientAvailable { .. } => AppError::Conflict(e.to_string()),
                    StockError::ReservationInvalid => AppError::Conflict(e.to_string()),
                }
            }
            Err(err) => err,
        };

        let err = match err.downcast::<ReservationError>() {
            Ok(e) => {
                return match *e {
                    ReservationError::NotFound(_) | ReservationError::ItemNotFound(_) => {
                        AppError::NotFound(e.to_string())
                    }
                    ReservationError::InsufficientAvailable { .. }
                    | ReservationError::NotActive => AppError::Conflict(e.to_string()),
                    ReservationError::InvalidQuantity | ReservationError::MissingPartyName => {
                        AppError::Validation(e.to_string())
                    }
                }
            }
            Err(err) => err,
        };

        match err.downcast::<ItemValidationError>() {
            Ok(e) => AppError::Validation(e.to_string()),
            Err(err) => AppError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Anyhow(err.into())
    }
}
