//! Payment transaction domain model.
//!
//! Records manual payment evidence (bank transfer screenshots, e-wallet
//! receipts) for commissions and booking deposits. Verification is a human
//! admin action, not a gateway callback.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::validation::validate_amount_idr;

/// How the payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    BankTransfer,
    Ewallet,
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Ewallet => "ewallet",
            PaymentMethod::Cash => "cash",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bank_transfer" => Some(PaymentMethod::BankTransfer),
            "ewallet" => Some(PaymentMethod::Ewallet),
            "cash" => Some(PaymentMethod::Cash),
            _ => None,
        }
    }
}

/// Transaction review status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Verified,
    Rejected,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Verified => "verified",
            PaymentStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PaymentStatus::Pending),
            "verified" => Some(PaymentStatus::Verified),
            "rejected" => Some(PaymentStatus::Rejected),
            _ => None,
        }
    }

    /// Pending transactions are the only ones an admin may settle.
    pub fn is_settled(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

/// A recorded payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTransaction {
    pub id: i64,
    pub transaction_id: Uuid,
    pub therapist_id: Uuid,
    pub commission_id: Option<Uuid>,
    pub booking_id: Option<Uuid>,
    pub amount: i64,
    pub method: PaymentMethod,
    pub screenshot_url: Option<String>,
    pub status: PaymentStatus,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Request payload for recording a payment.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    pub therapist_id: Uuid,

    pub commission_id: Option<Uuid>,

    pub booking_id: Option<Uuid>,

    #[validate(custom(function = "validate_amount_idr"))]
    pub amount: i64,

    pub method: PaymentMethod,

    #[validate(url(message = "Screenshot must be a valid URL"))]
    pub screenshot_url: Option<String>,
}

/// Request payload for settling a payment (admin).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPaymentRequest {
    pub approved: bool,
}

/// Response payload for payment operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub transaction_id: Uuid,
    pub therapist_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<Uuid>,
    pub amount: i64,
    pub method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot_url: Option<String>,
    pub status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentTransaction> for PaymentResponse {
    fn from(p: PaymentTransaction) -> Self {
        Self {
            transaction_id: p.transaction_id,
            therapist_id: p.therapist_id,
            commission_id: p.commission_id,
            booking_id: p.booking_id,
            amount: p.amount,
            method: p.method,
            screenshot_url: p.screenshot_url,
            status: p.status,
            reviewed_at: p.reviewed_at,
            created_at: p.created_at,
        }
    }
}

/// Response for listing payments.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPaymentsResponse {
    pub payments: Vec<PaymentResponse>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_roundtrip() {
        for m in [PaymentMethod::BankTransfer, PaymentMethod::Ewallet, PaymentMethod::Cash] {
            assert_eq!(PaymentMethod::parse(m.as_str()), Some(m));
        }
        assert_eq!(PaymentMethod::parse("crypto"), None);
    }

    #[test]
    fn test_status_roundtrip() {
        for s in [PaymentStatus::Pending, PaymentStatus::Verified, PaymentStatus::Rejected] {
            assert_eq!(PaymentStatus::parse(s.as_str()), Some(s));
        }
    }

    #[test]
    fn test_settled_statuses() {
        assert!(!PaymentStatus::Pending.is_settled());
        assert!(PaymentStatus::Verified.is_settled());
        assert!(PaymentStatus::Rejected.is_settled());
    }

    #[test]
    fn test_record_request_validation() {
        let ok = RecordPaymentRequest {
            therapist_id: Uuid::new_v4(),
            commission_id: Some(Uuid::new_v4()),
            booking_id: None,
            amount: 54_000,
            method: PaymentMethod::BankTransfer,
            screenshot_url: Some("https://storage.example.com/proof.png".to_string()),
        };
        assert!(ok.validate().is_ok());

        let bad = RecordPaymentRequest { amount: -1, ..ok };
        assert!(bad.validate().is_err());
    }
}
