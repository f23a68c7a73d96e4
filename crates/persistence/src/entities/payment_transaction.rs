//! Payment transaction database entity.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::payment::{PaymentMethod, PaymentStatus, PaymentTransaction};

use super::EntityError;

/// Database entity for payment_transactions table.
#[derive(Debug, Clone, FromRow)]
pub struct PaymentTransactionEntity {
    pub id: i64,
    pub transaction_id: Uuid,
    pub therapist_id: Uuid,
    pub commission_id: Option<Uuid>,
    pub booking_id: Option<Uuid>,
    pub amount: i64,
    pub method: String,
    pub screenshot_url: Option<String>,
    pub status: String,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PaymentTransactionEntity> for PaymentTransaction {
    type Error = EntityError;

    fn try_from(entity: PaymentTransactionEntity) -> Result<Self, Self::Error> {
        let method = PaymentMethod::parse(&entity.method)
            .ok_or_else(|| EntityError::invalid("payment_transactions", "method", &entity.method))?;
        let status = PaymentStatus::parse(&entity.status)
            .ok_or_else(|| EntityError::invalid("payment_transactions", "status", &entity.status))?;
        Ok(Self {
            id: entity.id,
            transaction_id: entity.transaction_id,
            therapist_id: entity.therapist_id,
            commission_id: entity.commission_id,
            booking_id: entity.booking_id,
            amount: entity.amount,
            method,
            screenshot_url: entity.screenshot_url,
            status,
            reviewed_by: entity.reviewed_by,
            reviewed_at: entity.reviewed_at,
            created_at: entity.created_at,
        })
    }
}
