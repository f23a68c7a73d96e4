//! Hourly ledger reconciliation background job.
//!
//! Booking acceptance writes the booking and its commission record in two
//! steps. This job diffs the two ledgers over a bounded window and backfills
//! commission records that the second step lost.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::{error, info, warn};

use domain::models::booking::Booking;
use domain::models::commission::{CommissionRecord, PAYMENT_DEADLINE_HOURS};
use domain::services::pricing;
use domain::services::reconciliation::{
    bookings_needing_commissions, reconcile, RECONCILIATION_SCAN_LIMIT,
};
use persistence::repositories::{BookingRepository, CommissionInput, CommissionRepository};

use super::scheduler::{Job, JobFrequency};
use crate::middleware::metrics;

/// Background job that repairs booking/commission ledger drift.
pub struct ReconciliationJob {
    pool: PgPool,
}

impl ReconciliationJob {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Job for ReconciliationJob {
    fn name(&self) -> &'static str {
        "reconciliation"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Hourly
    }

    async fn execute(&self) -> Result<(), String> {
        let booking_repo = BookingRepository::new(self.pool.clone());
        let commission_repo = CommissionRepository::new(self.pool.clone());

        let booking_entities = booking_repo
            .list_recent_commissionable(RECONCILIATION_SCAN_LIMIT)
            .await
            .map_err(|e| format!("Failed to load bookings: {}", e))?;
        let commission_entities = commission_repo
            .list_recent(RECONCILIATION_SCAN_LIMIT)
            .await
            .map_err(|e| format!("Failed to load commissions: {}", e))?;

        let bookings: Vec<Booking> = booking_entities
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<_, _>>()
            .map_err(|e| format!("Corrupt booking row: {}", e))?;
        let commissions: Vec<CommissionRecord> = commission_entities
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<_, _>>()
            .map_err(|e| format!("Corrupt commission row: {}", e))?;

        let report = reconcile(&bookings, &commissions);
        metrics::record_reconciliation_findings(report.critical_count());

        if report.is_clean() {
            info!(
                bookings = report.bookings_scanned,
                commissions = report.commissions_scanned,
                "Ledgers reconciled cleanly"
            );
            return Ok(());
        }

        warn!(
            missing = report.missing_commissions.len(),
            orphaned = report.orphaned_commissions.len(),
            "Reconciliation found ledger mismatches"
        );

        // Missing records are repairable; orphaned ones need a human look,
        // so they are only logged.
        let mut repaired = 0;
        for booking in bookings_needing_commissions(&report, &bookings) {
            let created = commission_repo
                .create(CommissionInput {
                    booking_id: booking.booking_id,
                    therapist_id: booking.therapist_id,
                    booking_amount: booking.total_price,
                    commission_rate: pricing::COMMISSION_RATE,
                    commission_amount: booking.admin_commission,
                    payment_deadline: Utc::now() + Duration::hours(PAYMENT_DEADLINE_HOURS),
                })
                .await;
            match created {
                Ok(_) => repaired += 1,
                Err(e) => {
                    error!(
                        booking_id = %booking.booking_id,
                        error = %e,
                        "Failed to backfill commission record"
                    );
                }
            }
        }

        for finding in &report.orphaned_commissions {
            error!(
                booking_id = %finding.booking_id,
                detail = %finding.detail,
                "Orphaned commission requires manual review"
            );
        }

        info!(repaired = repaired, "Reconciliation pass finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration as StdDuration;

    #[test]
    fn test_runs_hourly() {
        assert_eq!(JobFrequency::Hourly.duration(), StdDuration::from_secs(3600));
    }

    #[test]
    fn test_scan_window_is_bounded() {
        assert_eq!(RECONCILIATION_SCAN_LIMIT, 500);
    }
}
