//! Discount code database entity.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::discount_code::DiscountCode;

use super::EntityError;

/// Database entity for discount_codes table.
#[derive(Debug, Clone, FromRow)]
pub struct DiscountCodeEntity {
    pub id: i64,
    pub code_id: Uuid,
    pub code: String,
    pub therapist_id: Uuid,
    pub customer_id: String,
    pub percentage: i16,
    pub is_used: bool,
    pub expires_at: DateTime<Utc>,
    pub source: String,
    pub used_at: Option<DateTime<Utc>>,
    pub used_booking_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DiscountCodeEntity> for DiscountCode {
    type Error = EntityError;

    fn try_from(entity: DiscountCodeEntity) -> Result<Self, Self::Error> {
        let percentage = u8::try_from(entity.percentage).map_err(|_| {
            EntityError::invalid("discount_codes", "percentage", &entity.percentage.to_string())
        })?;
        Ok(Self {
            id: entity.id,
            code_id: entity.code_id,
            code: entity.code,
            therapist_id: entity.therapist_id,
            customer_id: entity.customer_id,
            percentage,
            is_used: entity.is_used,
            expires_at: entity.expires_at,
            source: entity.source,
            used_at: entity.used_at,
            used_booking_id: entity.used_booking_id,
            created_at: entity.created_at,
        })
    }
}
