use axum::{
    http::Method,
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod dashboard;
pub mod error;
pub mod history;
pub mod items;
pub mod middleware;
pub mod reservations;
pub mod state;
pub mod stock;
pub mod worker;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    let protected = Router::new()
        .route("/v1/items", get(items::list_items).post(items::create_item))
        .route(
            "/v1/items/{id}",
            get(items::get_item).delete(items::delete_item),
        )
        .route("/v1/items/{id}/stock", post(stock::update_stock))
        .route(
            "/v1/items/{id}/transactions",
            get(history::list_item_transactions),
        )
        .route(
            "/v1/items/{id}/reservations",
            get(reservations::list_item_reservations),
        )
        .route("/v1/low-stock", get(items::list_low_stock))
        .route("/v1/transactions", get(history::list_transactions))
        .route(
            "/v1/reservations",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route(
            "/v1/reservations/{id}/cancel",
            post(reservations::cancel_reservation),
        )
        .route(
            "/v1/reservations/{id}",
            delete(reservations::delete_reservation),
        )
        .route("/v1/dashboard/summary", get(dashboard::summary))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::staff_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health))
        .nest("/v1/auth", auth::routes())
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
