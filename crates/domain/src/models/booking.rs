//! Booking domain model and status machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::validation::{validate_amount_idr, validate_duration_minutes};

/// Minutes a therapist has to respond to a new booking request.
pub const RESPONSE_TIMEOUT_MINUTES: i64 = 5;

/// Window within which a second booking for the same customer/therapist
/// pair is treated as a duplicate.
pub const DUPLICATE_WINDOW_MINUTES: i64 = 5;

/// Booking lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    PendingAccept,
    Accepted,
    Confirmed,
    Completed,
    Cancelled,
    Expired,
}

impl BookingStatus {
    /// Stable string form used in the database and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::PendingAccept => "pending_accept",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Expired => "expired",
        }
    }

    /// Parses the stored string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending_accept" => Some(BookingStatus::PendingAccept),
            "accepted" => Some(BookingStatus::Accepted),
            "confirmed" => Some(BookingStatus::Confirmed),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            "expired" => Some(BookingStatus::Expired),
            _ => None,
        }
    }

    /// Statuses a booking may move to from the current one.
    pub fn allowed_transitions(&self) -> &'static [BookingStatus] {
        match self {
            BookingStatus::PendingAccept => &[
                BookingStatus::Accepted,
                BookingStatus::Cancelled,
                BookingStatus::Expired,
            ],
            BookingStatus::Accepted => &[
                BookingStatus::Confirmed,
                BookingStatus::Cancelled,
                BookingStatus::Expired,
            ],
            BookingStatus::Confirmed => &[BookingStatus::Completed, BookingStatus::Cancelled],
            // Terminal states
            BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::Expired => &[],
        }
    }

    /// Whether moving to `next` is a legal transition.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Whether a booking in this status must have a commission record.
    pub fn is_commissionable(&self) -> bool {
        matches!(
            self,
            BookingStatus::Accepted | BookingStatus::Confirmed | BookingStatus::Completed
        )
    }

    /// Whether a booking in this status blocks new duplicate bookings.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            BookingStatus::PendingAccept | BookingStatus::Accepted | BookingStatus::Confirmed
        )
    }
}

/// A booking between a customer and a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub booking_id: Uuid,
    /// Human-facing reference, e.g. `BK-1718000000000-7KQ2M9`.
    pub reference: String,
    pub customer_id: String,
    pub customer_phone: String,
    pub therapist_id: Uuid,
    pub service_type: String,
    pub duration_minutes: i32,
    pub city: String,
    /// Price the customer pays, after any discount, in IDR.
    pub total_price: i64,
    /// Platform cut (30% of total_price).
    pub admin_commission: i64,
    /// What the provider keeps.
    pub provider_payout: i64,
    pub discount_code_id: Option<Uuid>,
    pub status: BookingStatus,
    pub response_deadline: DateTime<Utc>,
    pub cancel_reason: Option<String>,
    pub notes: Option<String>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a booking.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[validate(length(min = 1, max = 64, message = "Customer ID is required"))]
    pub customer_id: String,

    #[validate(length(min = 6, max = 20, message = "Customer phone is required"))]
    pub customer_phone: String,

    pub therapist_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Service type is required"))]
    pub service_type: String,

    #[validate(custom(function = "validate_duration_minutes"))]
    pub duration_minutes: i32,

    #[validate(length(min = 1, max = 100, message = "City is required"))]
    pub city: String,

    /// Undiscounted service price in IDR.
    #[validate(custom(function = "validate_amount_idr"))]
    pub price: i64,

    /// Optional discount code to redeem against this booking.
    pub discount_code: Option<String>,

    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

/// Request payload for cancelling a booking.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingRequest {
    #[validate(length(max = 500, message = "Reason must be at most 500 characters"))]
    pub reason: Option<String>,
}

/// Response payload for booking operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub booking_id: Uuid,
    pub reference: String,
    pub customer_id: String,
    pub therapist_id: Uuid,
    pub service_type: String,
    pub duration_minutes: i32,
    pub city: String,
    pub total_price: i64,
    pub admin_commission: i64,
    pub provider_payout: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_code_id: Option<Uuid>,
    pub status: BookingStatus,
    pub response_deadline: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            booking_id: b.booking_id,
            reference: b.reference,
            customer_id: b.customer_id,
            therapist_id: b.therapist_id,
            service_type: b.service_type,
            duration_minutes: b.duration_minutes,
            city: b.city,
            total_price: b.total_price,
            admin_commission: b.admin_commission,
            provider_payout: b.provider_payout,
            discount_code_id: b.discount_code_id,
            status: b.status,
            response_deadline: b.response_deadline,
            cancel_reason: b.cancel_reason,
            notes: b.notes,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

/// Response for listing bookings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBookingsResponse {
    pub bookings: Vec<BookingResponse>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Query parameters for listing bookings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBookingsQuery {
    pub therapist_id: Option<Uuid>,
    pub customer_id: Option<String>,
    pub status: Option<BookingStatus>,
    #[serde(default)]
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            BookingStatus::PendingAccept,
            BookingStatus::Accepted,
            BookingStatus::Confirmed,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
            BookingStatus::Expired,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("unknown"), None);
    }

    #[test]
    fn test_happy_path_transitions() {
        assert!(BookingStatus::PendingAccept.can_transition_to(BookingStatus::Accepted));
        assert!(BookingStatus::Accepted.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Completed));
    }

    #[test]
    fn test_cancellation_and_expiry_transitions() {
        assert!(BookingStatus::PendingAccept.can_transition_to(BookingStatus::Cancelled));
        assert!(BookingStatus::PendingAccept.can_transition_to(BookingStatus::Expired));
        assert!(BookingStatus::Accepted.can_transition_to(BookingStatus::Cancelled));
        assert!(BookingStatus::Accepted.can_transition_to(BookingStatus::Expired));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Cancelled));
        // A confirmed booking is past the response deadline, it cannot expire
        assert!(!BookingStatus::Confirmed.can_transition_to(BookingStatus::Expired));
    }

    #[test]
    fn test_terminal_states_have_no_transitions() {
        for terminal in [
            BookingStatus::Completed,
            BookingStatus::Cancelled,
            BookingStatus::Expired,
        ] {
            assert!(terminal.allowed_transitions().is_empty());
        }
    }

    #[test]
    fn test_no_skipping_states() {
        assert!(!BookingStatus::PendingAccept.can_transition_to(BookingStatus::Confirmed));
        assert!(!BookingStatus::PendingAccept.can_transition_to(BookingStatus::Completed));
        assert!(!BookingStatus::Accepted.can_transition_to(BookingStatus::Completed));
    }

    #[test]
    fn test_commissionable_statuses() {
        assert!(BookingStatus::Accepted.is_commissionable());
        assert!(BookingStatus::Confirmed.is_commissionable());
        assert!(BookingStatus::Completed.is_commissionable());
        assert!(!BookingStatus::PendingAccept.is_commissionable());
        assert!(!BookingStatus::Cancelled.is_commissionable());
        assert!(!BookingStatus::Expired.is_commissionable());
    }

    #[test]
    fn test_open_statuses_block_duplicates() {
        assert!(BookingStatus::PendingAccept.is_open());
        assert!(BookingStatus::Accepted.is_open());
        assert!(BookingStatus::Confirmed.is_open());
        assert!(!BookingStatus::Completed.is_open());
    }

    #[test]
    fn test_create_booking_request_deserialization() {
        let json = r#"{
            "customerId": "cust_8821",
            "customerPhone": "+628123456789",
            "therapistId": "550e8400-e29b-41d4-a716-446655440000",
            "serviceType": "Balinese Massage",
            "durationMinutes": 90,
            "city": "Denpasar",
            "price": 200000
        }"#;

        let request: CreateBookingRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.price, 200000);
        assert_eq!(request.duration_minutes, 90);
        assert!(request.discount_code.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_booking_request_validation_rejects_bad_amount() {
        let json = r#"{
            "customerId": "cust_8821",
            "customerPhone": "+628123456789",
            "therapistId": "550e8400-e29b-41d4-a716-446655440000",
            "serviceType": "Balinese Massage",
            "durationMinutes": 90,
            "city": "Denpasar",
            "price": 0
        }"#;

        let request: CreateBookingRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&BookingStatus::PendingAccept).unwrap();
        assert_eq!(json, "\"pending_accept\"");
    }
}
