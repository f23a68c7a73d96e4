//! Discount code domain model and validation rules.
//!
//! A code is issued by a therapist to one specific customer, is single-use,
//! and expires seven days after issue. Expiry is derived from `expires_at`
//! at read time, never stored as a transition.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use shared::validation::validate_discount_percentage;

/// Days a discount code stays valid after issue.
pub const CODE_VALIDITY_DAYS: i64 = 7;

/// Derived lifecycle state of a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountCodeState {
    Active,
    Used,
    Expired,
}

/// Why a code failed validation. Checks run in a fixed order and the first
/// failure wins, so a used *and* expired code reports `AlreadyUsed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountRejection {
    #[error("Discount code not found")]
    NotFound,
    #[error("Discount code was issued by a different therapist")]
    TherapistMismatch,
    #[error("Discount code was issued to a different customer")]
    CustomerMismatch,
    #[error("Discount code has already been used")]
    AlreadyUsed,
    #[error("Discount code has expired")]
    Expired,
}

/// A single-use discount code bound to a therapist-customer pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountCode {
    pub id: i64,
    pub code_id: Uuid,
    /// Customer-facing code string, e.g. `DSC-7KQ2M9XA`.
    pub code: String,
    pub therapist_id: Uuid,
    pub customer_id: String,
    pub percentage: u8,
    pub is_used: bool,
    pub expires_at: DateTime<Utc>,
    /// Where the code came from, e.g. `therapist_chat` or `loyalty`.
    pub source: String,
    pub used_at: Option<DateTime<Utc>>,
    pub used_booking_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl DiscountCode {
    /// Expiry timestamp for a code issued at `issued_at`.
    pub fn expiry_from(issued_at: DateTime<Utc>) -> DateTime<Utc> {
        issued_at + Duration::days(CODE_VALIDITY_DAYS)
    }

    /// Derived state at time `now`. A used code stays `Used` even after its
    /// expiry date passes.
    pub fn state_at(&self, now: DateTime<Utc>) -> DiscountCodeState {
        if self.is_used {
            DiscountCodeState::Used
        } else if now > self.expires_at {
            DiscountCodeState::Expired
        } else {
            DiscountCodeState::Active
        }
    }

    /// Validates this code for redemption by the given pair.
    ///
    /// Check order: therapist → customer → used → expired.
    pub fn validate_for(
        &self,
        therapist_id: Uuid,
        customer_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(), DiscountRejection> {
        if self.therapist_id != therapist_id {
            return Err(DiscountRejection::TherapistMismatch);
        }
        if self.customer_id != customer_id {
            return Err(DiscountRejection::CustomerMismatch);
        }
        if self.is_used {
            return Err(DiscountRejection::AlreadyUsed);
        }
        if now > self.expires_at {
            return Err(DiscountRejection::Expired);
        }
        Ok(())
    }
}

/// Request payload for generating a discount code.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDiscountRequest {
    pub therapist_id: Uuid,

    #[validate(length(min = 1, max = 64, message = "Customer ID is required"))]
    pub customer_id: String,

    #[validate(custom(function = "validate_discount_percentage"))]
    pub percentage: u8,

    #[validate(length(min = 1, max = 50, message = "Source tag is required"))]
    pub source: String,
}

/// Request payload for validating or redeeming a code.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RedeemDiscountRequest {
    #[validate(length(min = 1, max = 20, message = "Code is required"))]
    pub code: String,

    pub therapist_id: Uuid,

    #[validate(length(min = 1, max = 64, message = "Customer ID is required"))]
    pub customer_id: String,

    /// Booking amount the discount will apply to, in IDR.
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: i64,
}

/// Response payload for a discount code.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountCodeResponse {
    pub code_id: Uuid,
    pub code: String,
    pub therapist_id: Uuid,
    pub customer_id: String,
    pub percentage: u8,
    pub state: DiscountCodeState,
    pub expires_at: DateTime<Utc>,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl DiscountCodeResponse {
    pub fn from_code(code: DiscountCode, now: DateTime<Utc>) -> Self {
        let state = code.state_at(now);
        Self {
            code_id: code.code_id,
            code: code.code,
            therapist_id: code.therapist_id,
            customer_id: code.customer_id,
            percentage: code.percentage,
            state,
            expires_at: code.expires_at,
            source: code.source,
            used_at: code.used_at,
            created_at: code.created_at,
        }
    }
}

/// Per-therapist discount issuance stats.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountStatsResponse {
    pub therapist_id: Uuid,
    pub total_sent: usize,
    pub active: usize,
    pub used: usize,
    pub expired: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(is_used: bool, expires_at: DateTime<Utc>) -> DiscountCode {
        DiscountCode {
            id: 1,
            code_id: Uuid::new_v4(),
            code: "DSC-7KQ2M9XA".to_string(),
            therapist_id: Uuid::new_v4(),
            customer_id: "cust_8821".to_string(),
            percentage: 10,
            is_used,
            expires_at,
            source: "therapist_chat".to_string(),
            used_at: None,
            used_booking_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_valid_code_passes() {
        let c = code(false, Utc::now() + Duration::days(3));
        assert!(c.validate_for(c.therapist_id, "cust_8821", Utc::now()).is_ok());
    }

    #[test]
    fn test_therapist_mismatch_rejected_first() {
        // Even a used, expired code reports the pair mismatch first.
        let mut c = code(true, Utc::now() - Duration::days(1));
        c.is_used = true;
        let result = c.validate_for(Uuid::new_v4(), "cust_8821", Utc::now());
        assert_eq!(result, Err(DiscountRejection::TherapistMismatch));
    }

    #[test]
    fn test_customer_mismatch_rejected() {
        let c = code(false, Utc::now() + Duration::days(3));
        let result = c.validate_for(c.therapist_id, "someone_else", Utc::now());
        assert_eq!(result, Err(DiscountRejection::CustomerMismatch));
    }

    #[test]
    fn test_used_code_never_validates_again() {
        let c = code(true, Utc::now() + Duration::days(3));
        let result = c.validate_for(c.therapist_id, "cust_8821", Utc::now());
        assert_eq!(result, Err(DiscountRejection::AlreadyUsed));
    }

    #[test]
    fn test_used_reported_before_expired() {
        let c = code(true, Utc::now() - Duration::days(1));
        let result = c.validate_for(c.therapist_id, "cust_8821", Utc::now());
        assert_eq!(result, Err(DiscountRejection::AlreadyUsed));
    }

    #[test]
    fn test_expired_code_rejected() {
        let c = code(false, Utc::now() - Duration::seconds(1));
        let result = c.validate_for(c.therapist_id, "cust_8821", Utc::now());
        assert_eq!(result, Err(DiscountRejection::Expired));
    }

    #[test]
    fn test_state_derivation() {
        let now = Utc::now();
        assert_eq!(
            code(false, now + Duration::days(1)).state_at(now),
            DiscountCodeState::Active
        );
        assert_eq!(
            code(false, now - Duration::days(1)).state_at(now),
            DiscountCodeState::Expired
        );
        // Used wins over expired
        assert_eq!(
            code(true, now - Duration::days(1)).state_at(now),
            DiscountCodeState::Used
        );
    }

    #[test]
    fn test_expiry_is_seven_days() {
        let issued = Utc::now();
        let expiry = DiscountCode::expiry_from(issued);
        assert_eq!(expiry - issued, Duration::days(7));
    }

    #[test]
    fn test_generate_request_rejects_odd_percentage() {
        let request = GenerateDiscountRequest {
            therapist_id: Uuid::new_v4(),
            customer_id: "cust_8821".to_string(),
            percentage: 25,
            source: "therapist_chat".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_generate_request_accepts_allowed_percentages() {
        for p in [5u8, 10, 15, 20, 30] {
            let request = GenerateDiscountRequest {
                therapist_id: Uuid::new_v4(),
                customer_id: "cust_8821".to_string(),
                percentage: p,
                source: "therapist_chat".to_string(),
            };
            assert!(request.validate().is_ok(), "percentage {} should pass", p);
        }
    }
}
