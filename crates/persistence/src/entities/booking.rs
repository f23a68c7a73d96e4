//! Booking database entity.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::booking::{Booking, BookingStatus};

use super::EntityError;

/// Database entity for bookings table.
#[derive(Debug, Clone, FromRow)]
pub struct BookingEntity {
    pub id: i64,
    pub booking_id: Uuid,
    pub reference: String,
    pub customer_id: String,
    pub customer_phone: String,
    pub therapist_id: Uuid,
    pub service_type: String,
    pub duration_minutes: i32,
    pub city: String,
    pub total_price: i64,
    pub admin_commission: i64,
    pub provider_payout: i64,
    pub discount_code_id: Option<Uuid>,
    pub status: String,
    pub response_deadline: DateTime<Utc>,
    pub cancel_reason: Option<String>,
    pub notes: Option<String>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<BookingEntity> for Booking {
    type Error = EntityError;

    fn try_from(entity: BookingEntity) -> Result<Self, Self::Error> {
        let status = BookingStatus::parse(&entity.status)
            .ok_or_else(|| EntityError::invalid("bookings", "status", &entity.status))?;
        Ok(Self {
            id: entity.id,
            booking_id: entity.booking_id,
            reference: entity.reference,
            customer_id: entity.customer_id,
            customer_phone: entity.customer_phone,
            therapist_id: entity.therapist_id,
            service_type: entity.service_type,
            duration_minutes: entity.duration_minutes,
            city: entity.city,
            total_price: entity.total_price,
            admin_commission: entity.admin_commission,
            provider_payout: entity.provider_payout,
            discount_code_id: entity.discount_code_id,
            status,
            response_deadline: entity.response_deadline,
            cancel_reason: entity.cancel_reason,
            notes: entity.notes,
            accepted_at: entity.accepted_at,
            confirmed_at: entity.confirmed_at,
            completed_at: entity.completed_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::phone_number::en::PhoneNumber;
    use fake::Fake;

    fn entity(status: &str) -> BookingEntity {
        let now = Utc::now();
        BookingEntity {
            id: 7,
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
            status: status.to_string(),
            response_deadline: now,
            cancel_reason: None,
            notes: None,
            accepted_at: None,
            confirmed_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_entity_converts_with_known_status() {
        let e = entity("pending_accept");
        let booking_id = e.booking_id;
        let booking: Booking = e.try_into().expect("conversion failed");
        assert_eq!(booking.status, BookingStatus::PendingAccept);
        assert_eq!(booking.booking_id, booking_id);
        assert_eq!(booking.total_price, 180_000);
    }

    #[test]
    fn test_entity_rejects_unknown_status() {
        let err = Booking::try_from(entity("teleported")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("status"));
        assert!(message.contains("teleported"));
    }
}
