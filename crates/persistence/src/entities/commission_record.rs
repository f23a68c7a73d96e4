//! Commission record database entity.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::commission::{CommissionRecord, CommissionStatus};

use super::EntityError;

/// Database entity for commission_records table.
#[derive(Debug, Clone, FromRow)]
pub struct CommissionRecordEntity {
    pub id: i64,
    pub commission_id: Uuid,
    pub booking_id: Uuid,
    pub therapist_id: Uuid,
    pub booking_amount: i64,
    pub commission_rate: f64,
    pub commission_amount: i64,
    pub payment_deadline: DateTime<Utc>,
    pub status: String,
    pub late_fee: Option<i64>,
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

impl TryFrom<CommissionRecordEntity> for CommissionRecord {
    type Error = EntityError;

    fn try_from(entity: CommissionRecordEntity) -> Result<Self, Self::Error> {
        let status = CommissionStatus::parse(&entity.status)
            .ok_or_else(|| EntityError::invalid("commission_records", "status", &entity.status))?;
        Ok(Self {
            id: entity.id,
            commission_id: entity.commission_id,
            booking_id: entity.booking_id,
            therapist_id: entity.therapist_id,
            booking_amount: entity.booking_amount,
            commission_rate: entity.commission_rate,
            commission_amount: entity.commission_amount,
            payment_deadline: entity.payment_deadline,
            status,
            late_fee: entity.late_fee,
            total_due: entity.total_due,
            payment_proof_url: entity.payment_proof_url,
            payment_method: entity.payment_method,
            proof_submitted_at: entity.proof_submitted_at,
            verified_by: entity.verified_by,
            verified_at: entity.verified_at,
            rejection_reason: entity.rejection_reason,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}
