//! Orphan reconciliation between bookings and commission records.
//!
//! Every commissionable booking must carry exactly one commission record.
//! This module computes the diff over a bounded scan window; repair
//! (creating missing records) happens in the job that calls it.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::models::booking::{Booking, BookingStatus};
use crate::models::commission::{CommissionRecord, CommissionStatus};

/// Upper bound on bookings and commissions examined per run.
pub const RECONCILIATION_SCAN_LIMIT: i64 = 500;

/// Severity of a reconciliation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingSeverity {
    Critical,
    Informational,
}

/// A single mismatch between the booking and commission ledgers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub booking_id: Uuid,
    pub severity: FindingSeverity,
    pub detail: String,
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    pub bookings_scanned: usize,
    pub commissions_scanned: usize,
    /// Commissionable bookings with no commission record. Critical.
    pub missing_commissions: Vec<Finding>,
    /// Non-reversed commissions whose booking is gone or no longer
    /// commissionable. Critical.
    pub orphaned_commissions: Vec<Finding>,
    /// Reversed commissions pointing at non-commissionable bookings.
    /// Expected after cancellations.
    pub reversed_orphans: Vec<Finding>,
}

impl ReconciliationReport {
    pub fn is_clean(&self) -> bool {
        self.missing_commissions.is_empty() && self.orphaned_commissions.is_empty()
    }

    pub fn critical_count(&self) -> usize {
        self.missing_commissions.len() + self.orphaned_commissions.len()
    }
}

/// Diffs the two ledgers. Both inputs are assumed to come from the same
/// scan window, capped at [`RECONCILIATION_SCAN_LIMIT`] rows each.
pub fn reconcile(bookings: &[Booking], commissions: &[CommissionRecord]) -> ReconciliationReport {
    let commissions_by_booking: HashMap<Uuid, &CommissionRecord> = commissions
        .iter()
        .map(|c| (c.booking_id, c))
        .collect();
    let bookings_by_id: HashMap<Uuid, &Booking> =
        bookings.iter().map(|b| (b.booking_id, b)).collect();

    let mut missing_commissions = Vec::new();
    for booking in bookings {
        if booking.status.is_commissionable()
            && !commissions_by_booking.contains_key(&booking.booking_id)
        {
            missing_commissions.push(Finding {
                booking_id: booking.booking_id,
                severity: FindingSeverity::Critical,
                detail: format!(
                    "booking {} ({}) has no commission record",
                    booking.reference,
                    booking.status.as_str()
                ),
            });
        }
    }

    let mut orphaned_commissions = Vec::new();
    let mut reversed_orphans = Vec::new();
    for commission in commissions {
        let orphaned = match bookings_by_id.get(&commission.booking_id) {
            Some(booking) => !booking.status.is_commissionable(),
            None => true,
        };
        if !orphaned {
            continue;
        }
        if commission.status == CommissionStatus::Reversed {
            reversed_orphans.push(Finding {
                booking_id: commission.booking_id,
                severity: FindingSeverity::Informational,
                detail: format!(
                    "reversed commission {} references a non-commissionable booking",
                    commission.commission_id
                ),
            });
        } else {
            orphaned_commissions.push(Finding {
                booking_id: commission.booking_id,
                severity: FindingSeverity::Critical,
                detail: format!(
                    "commission {} ({}) references a non-commissionable booking",
                    commission.commission_id,
                    commission.status.as_str()
                ),
            });
        }
    }

    ReconciliationReport {
        bookings_scanned: bookings.len(),
        commissions_scanned: commissions.len(),
        missing_commissions,
        orphaned_commissions,
        reversed_orphans,
    }
}

/// Bookings from the report that need a commission record created.
pub fn bookings_needing_commissions<'a>(
    report: &ReconciliationReport,
    bookings: &'a [Booking],
) -> Vec<&'a Booking> {
    let missing: Vec<Uuid> = report
        .missing_commissions
        .iter()
        .map(|f| f.booking_id)
        .collect();
    bookings
        .iter()
        .filter(|b| missing.contains(&b.booking_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use fake::faker::phone_number::en::PhoneNumber;
    use fake::Fake;

    fn booking(status: BookingStatus) -> Booking {
        let now = Utc::now();
        Booking {
            id: 1,
            booking_id: Uuid::new_v4(),
            reference: "BK-1724700000000-AB12CD".to_string(),
            customer_id: format!("cust_{}", (1000..9999).fake::<u32>()),
            customer_phone: PhoneNumber().fake(),
            therapist_id: Uuid::new_v4(),
            service_type: "Balinese Massage".to_string(),
            duration_minutes: 90,
            city: "Denpasar".to_string(),
            total_price: 180_000,
            admin_commission: 54_000,
            provider_payout: 126_000,
            discount_code_id: None,
            status,
            response_deadline: now + Duration::minutes(5),
            cancel_reason: None,
            notes: None,
            accepted_at: None,
            confirmed_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn commission(booking_id: Uuid, status: CommissionStatus) -> CommissionRecord {
        let now = Utc::now();
        CommissionRecord {
            id: 1,
            commission_id: Uuid::new_v4(),
            booking_id,
            therapist_id: Uuid::new_v4(),
            booking_amount: 180_000,
            commission_rate: 0.30,
            commission_amount: 54_000,
            payment_deadline: now + Duration::hours(5),
            status,
            late_fee: None,
            total_due: None,
            payment_proof_url: None,
            payment_method: None,
            proof_submitted_at: None,
            verified_by: None,
            verified_at: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_clean_ledgers() {
        let b = booking(BookingStatus::Completed);
        let c = commission(b.booking_id, CommissionStatus::Pending);
        let report = reconcile(&[b], &[c]);
        assert!(report.is_clean());
        assert_eq!(report.critical_count(), 0);
        assert_eq!(report.bookings_scanned, 1);
        assert_eq!(report.commissions_scanned, 1);
    }

    #[test]
    fn test_missing_commission_is_critical() {
        let b = booking(BookingStatus::Accepted);
        let report = reconcile(&[b], &[]);
        assert_eq!(report.missing_commissions.len(), 1);
        assert_eq!(
            report.missing_commissions[0].severity,
            FindingSeverity::Critical
        );
        assert!(!report.is_clean());
    }

    #[test]
    fn test_non_commissionable_booking_needs_no_record() {
        let pending = booking(BookingStatus::PendingAccept);
        let cancelled = booking(BookingStatus::Cancelled);
        let report = reconcile(&[pending, cancelled], &[]);
        assert!(report.is_clean());
    }

    #[test]
    fn test_orphaned_commission_is_critical() {
        // Commission points at a booking that no longer exists
        let c = commission(Uuid::new_v4(), CommissionStatus::Pending);
        let report = reconcile(&[], &[c]);
        assert_eq!(report.orphaned_commissions.len(), 1);
        assert_eq!(report.critical_count(), 1);
    }

    #[test]
    fn test_commission_outside_scan_window_reads_as_orphan() {
        // A pending commission whose accepted booking is absent from the
        // scanned slice is indistinguishable from a true orphan, so the
        // booking fetch must carry every commissionable booking.
        let unscanned = booking(BookingStatus::Accepted);
        let c = commission(unscanned.booking_id, CommissionStatus::Pending);
        let report = reconcile(&[], &[c]);
        assert_eq!(report.orphaned_commissions.len(), 1);
        assert_eq!(
            report.orphaned_commissions[0].severity,
            FindingSeverity::Critical
        );
    }

    #[test]
    fn test_commission_on_cancelled_booking_is_orphaned() {
        let b = booking(BookingStatus::Cancelled);
        let c = commission(b.booking_id, CommissionStatus::Pending);
        let report = reconcile(&[b], &[c]);
        assert_eq!(report.orphaned_commissions.len(), 1);
        assert!(report.reversed_orphans.is_empty());
    }

    #[test]
    fn test_reversed_orphan_is_informational() {
        let b = booking(BookingStatus::Cancelled);
        let c = commission(b.booking_id, CommissionStatus::Reversed);
        let report = reconcile(&[b], &[c]);
        assert!(report.orphaned_commissions.is_empty());
        assert_eq!(report.reversed_orphans.len(), 1);
        assert_eq!(
            report.reversed_orphans[0].severity,
            FindingSeverity::Informational
        );
        assert!(report.is_clean());
    }

    #[test]
    fn test_bookings_needing_commissions() {
        let covered = booking(BookingStatus::Completed);
        let uncovered = booking(BookingStatus::Completed);
        let c = commission(covered.booking_id, CommissionStatus::Paid);
        let bookings = vec![covered, uncovered];
        let report = reconcile(&bookings, &[c]);
        let needing = bookings_needing_commissions(&report, &bookings);
        assert_eq!(needing.len(), 1);
        assert_eq!(needing[0].booking_id, bookings[1].booking_id);
    }
}
