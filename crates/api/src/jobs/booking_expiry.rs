//! Booking expiry background job.
//!
//! Providers get five minutes to accept a booking. This job sweeps pending
//! bookings past their response deadline into `expired` so the customer can
//! rebook elsewhere.

use sqlx::PgPool;
use tracing::info;

use persistence::repositories::BookingRepository;

use super::scheduler::{Job, JobFrequency};
use crate::middleware::metrics;

/// Background job that expires unanswered bookings.
pub struct BookingExpiryJob {
    pool: PgPool,
}

impl BookingExpiryJob {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Job for BookingExpiryJob {
    fn name(&self) -> &'static str {
        "booking_expiry"
    }

    fn frequency(&self) -> JobFrequency {
        // The response window is five minutes; a one minute sweep keeps the
        // worst-case overshoot small.
        JobFrequency::Minutes(1)
    }

    async fn execute(&self) -> Result<(), String> {
        let repo = BookingRepository::new(self.pool.clone());

        let expired = repo
            .expire_overdue_pending()
            .await
            .map_err(|e| format!("Failed to expire overdue bookings: {}", e))?;

        if !expired.is_empty() {
            metrics::record_bookings_expired(expired.len());
            for booking in &expired {
                info!(
                    booking_id = %booking.booking_id,
                    reference = %booking.reference,
                    "Booking expired without provider response"
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_sweep_runs_every_minute() {
        let freq = JobFrequency::Minutes(1);
        assert_eq!(freq.duration(), Duration::from_secs(60));
    }

    #[test]
    fn test_sweep_is_faster_than_response_window() {
        let window = domain::models::booking::RESPONSE_TIMEOUT_MINUTES as u64 * 60;
        assert!(JobFrequency::Minutes(1).duration().as_secs() < window);
    }
}
