use std::sync::Arc;

use chrono::Utc;
use tokio::time::{sleep, Duration};
use tracing::{error, info};

use kardex_core::repository::ReservationRepository;

/// Periodically flips active reservations past their `reserved_until`
/// date to EXPIRED and releases their held quantities.
pub async fn start_reservation_sweeper(
    reservations: Arc<dyn ReservationRepository>,
    interval_seconds: u64,
) {
    info!(
        "Reservation sweeper started, interval {}s",
        interval_seconds
    );

    loop {
        sleep(Duration::from_secs(interval_seconds)).await;

        let today = Utc::now().date_naive();
        match reservations.expire_due(today).await {
            Ok(0) => {}
            Ok(n) => info!("Expired {} overdue reservation(s)", n),
            Err(e) => error!("Reservation sweep failed: {}", e),
        }
    }
}
