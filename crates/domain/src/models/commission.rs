//! Commission record domain model.
//!
//! One record exists per accepted booking; it tracks the platform's 30% cut
//! through payment, verification and (for cancelled bookings) reversal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Hours a therapist has to pay a commission after it is created.
pub const PAYMENT_DEADLINE_HOURS: i64 = 5;

/// Flat late fee applied once a commission goes overdue, in IDR.
pub const LATE_FEE_IDR: i64 = 50_000;

/// Commission record lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionStatus {
    /// Created, payment not yet submitted.
    Pending,
    /// Proof uploaded, waiting for admin review.
    AwaitingVerification,
    /// Admin approved the payment.
    Paid,
    /// Admin rejected the proof; a new one must be submitted.
    Rejected,
    /// Payment deadline passed without proof.
    Overdue,
    /// Booking was cancelled after the commission was created.
    Reversed,
}

impl CommissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommissionStatus::Pending => "pending",
            CommissionStatus::AwaitingVerification => "awaiting_verification",
            CommissionStatus::Paid => "paid",
            CommissionStatus::Rejected => "rejected",
            CommissionStatus::Overdue => "overdue",
            CommissionStatus::Reversed => "reversed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(CommissionStatus::Pending),
            "awaiting_verification" => Some(CommissionStatus::AwaitingVerification),
            "paid" => Some(CommissionStatus::Paid),
            "rejected" => Some(CommissionStatus::Rejected),
            "overdue" => Some(CommissionStatus::Overdue),
            "reversed" => Some(CommissionStatus::Reversed),
            _ => None,
        }
    }

    /// Whether the platform is still owed money for this record.
    pub fn is_unpaid(&self) -> bool {
        matches!(self, CommissionStatus::Pending | CommissionStatus::Overdue)
    }

    /// Whether a payment proof may be submitted from this status.
    ///
    /// Uploads are locked while a proof is under review and after approval,
    /// so a therapist cannot overwrite evidence mid-verification.
    pub fn allows_proof_submission(&self) -> bool {
        matches!(
            self,
            CommissionStatus::Pending | CommissionStatus::Rejected | CommissionStatus::Overdue
        )
    }
}

/// The platform's commission on a single booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionRecord {
    pub id: i64,
    pub commission_id: Uuid,
    pub booking_id: Uuid,
    pub therapist_id: Uuid,
    /// Booking amount the rate was applied to, in IDR.
    pub booking_amount: i64,
    /// Fixed at 0.30 for all current records; stored per record so historic
    /// rows survive a future rate change.
    pub commission_rate: f64,
    pub commission_amount: i64,
    pub payment_deadline: DateTime<Utc>,
    pub status: CommissionStatus,
    pub late_fee: Option<i64>,
    /// commission_amount + late_fee once overdue.
    pub total_due: Option<i64>,
    pub payment_proof_url: Option<String>,
    pub payment_method: Option<String>,
    pub proof_submitted_at: Option<DateTime<Utc>>,
    pub verified_by: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommissionRecord {
    /// Amount currently owed for this record, including any late fee.
    pub fn amount_due(&self) -> i64 {
        self.total_due.unwrap_or(self.commission_amount)
    }
}

/// Request payload for submitting a payment proof.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitProofRequest {
    /// URL of the proof screenshot in the external storage bucket.
    #[validate(url(message = "Proof URL must be a valid URL"))]
    pub proof_url: String,

    #[validate(length(min = 1, max = 50, message = "Payment method is required"))]
    pub payment_method: String,
}

/// Request payload for admin verification of a payment proof.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    pub approved: bool,

    #[validate(length(max = 500, message = "Reason must be at most 500 characters"))]
    pub rejection_reason: Option<String>,
}

/// Response payload for commission operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionResponse {
    pub commission_id: Uuid,
    pub booking_id: Uuid,
    pub therapist_id: Uuid,
    pub booking_amount: i64,
    pub commission_rate: f64,
    pub commission_amount: i64,
    pub amount_due: i64,
    pub payment_deadline: DateTime<Utc>,
    pub status: CommissionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub late_fee: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_proof_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<CommissionRecord> for CommissionResponse {
    fn from(c: CommissionRecord) -> Self {
        let amount_due = c.amount_due();
        Self {
            commission_id: c.commission_id,
            booking_id: c.booking_id,
            therapist_id: c.therapist_id,
            booking_amount: c.booking_amount,
            commission_rate: c.commission_rate,
            commission_amount: c.commission_amount,
            amount_due,
            payment_deadline: c.payment_deadline,
            status: c.status,
            late_fee: c.late_fee,
            payment_proof_url: c.payment_proof_url,
            payment_method: c.payment_method,
            rejection_reason: c.rejection_reason,
            verified_at: c.verified_at,
            created_at: c.created_at,
        }
    }
}

/// Response for listing commission records.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCommissionsResponse {
    pub commissions: Vec<CommissionResponse>,
    pub total: usize,
}

/// Unpaid balance summary for a therapist.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnpaidSummaryResponse {
    pub therapist_id: Uuid,
    pub unpaid_count: usize,
    pub unpaid_total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: CommissionStatus) -> CommissionRecord {
        CommissionRecord {
            id: 1,
            commission_id: Uuid::new_v4(),
            booking_id: Uuid::new_v4(),
            therapist_id: Uuid::new_v4(),
            booking_amount: 180_000,
            commission_rate: 0.30,
            commission_amount: 54_000,
            payment_deadline: Utc::now(),
            status,
            late_fee: None,
            total_due: None,
            payment_proof_url: None,
            payment_method: None,
            proof_submitted_at: None,
            verified_by: None,
            verified_at: None,
            rejection_reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            CommissionStatus::Pending,
            CommissionStatus::AwaitingVerification,
            CommissionStatus::Paid,
            CommissionStatus::Rejected,
            CommissionStatus::Overdue,
            CommissionStatus::Reversed,
        ] {
            assert_eq!(CommissionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(CommissionStatus::parse("bogus"), None);
    }

    #[test]
    fn test_unpaid_statuses() {
        assert!(CommissionStatus::Pending.is_unpaid());
        assert!(CommissionStatus::Overdue.is_unpaid());
        assert!(!CommissionStatus::AwaitingVerification.is_unpaid());
        assert!(!CommissionStatus::Paid.is_unpaid());
        assert!(!CommissionStatus::Reversed.is_unpaid());
    }

    #[test]
    fn test_proof_submission_lock() {
        assert!(CommissionStatus::Pending.allows_proof_submission());
        assert!(CommissionStatus::Rejected.allows_proof_submission());
        assert!(CommissionStatus::Overdue.allows_proof_submission());
        // Locked while under review or settled
        assert!(!CommissionStatus::AwaitingVerification.allows_proof_submission());
        assert!(!CommissionStatus::Paid.allows_proof_submission());
        assert!(!CommissionStatus::Reversed.allows_proof_submission());
    }

    #[test]
    fn test_amount_due_without_late_fee() {
        let c = record(CommissionStatus::Pending);
        assert_eq!(c.amount_due(), 54_000);
    }

    #[test]
    fn test_amount_due_with_late_fee() {
        let mut c = record(CommissionStatus::Overdue);
        c.late_fee = Some(LATE_FEE_IDR);
        c.total_due = Some(c.commission_amount + LATE_FEE_IDR);
        assert_eq!(c.amount_due(), 104_000);
    }

    #[test]
    fn test_submit_proof_request_validation() {
        let ok = SubmitProofRequest {
            proof_url: "https://storage.example.com/proofs/abc.png".to_string(),
            payment_method: "bank_transfer".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = SubmitProofRequest {
            proof_url: "not-a-url".to_string(),
            payment_method: "bank_transfer".to_string(),
        };
        assert!(bad.validate().is_err());
    }
}
