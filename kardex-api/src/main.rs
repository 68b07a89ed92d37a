use std::net::SocketAddr;
use std::sync::Arc;

use kardex_api::{app, state::AuthSettings, AppState};
use kardex_store::{
    DbClient, StoreItemRepository, StoreReservationRepository, StoreTransactionRepository,
    StoreUserRepository,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kardex_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = kardex_store::Config::load().expect("Failed to load config");
    tracing::info!("Starting Kardex API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let reservations = Arc::new(StoreReservationRepository::new(db.pool.clone()));

    let state = AppState {
        items: Arc::new(StoreItemRepository::new(db.pool.clone())),
        transactions: Arc::new(StoreTransactionRepository::new(db.pool.clone())),
        reservations: reservations.clone(),
        users: Arc::new(StoreUserRepository::new(db.pool.clone())),
        auth: AuthSettings {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
        business_rules: config.business_rules.clone(),
    };

    tokio::spawn(kardex_api::worker::start_reservation_sweeper(
        reservations,
        config.business_rules.reservation_sweep_seconds,
    ));

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
