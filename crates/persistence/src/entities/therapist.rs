//! Provider database entity.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::therapist::{AvailabilityStatus, ProviderType, Therapist};

use super::EntityError;

/// Database entity for therapists table.
#[derive(Debug, Clone, FromRow)]
pub struct TherapistEntity {
    pub id: i64,
    pub therapist_id: Uuid,
    pub name: String,
    pub provider_type: String,
    pub city: String,
    pub country_code: String,
    pub status: String,
    pub booking_enabled: bool,
    pub schedule_enabled: bool,
    pub deactivation_reason: Option<String>,
    pub pricing: Option<serde_json::Value>,
    pub profile_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TherapistEntity> for Therapist {
    type Error = EntityError;

    fn try_from(entity: TherapistEntity) -> Result<Self, Self::Error> {
        let provider_type = ProviderType::parse(&entity.provider_type).ok_or_else(|| {
            EntityError::invalid("therapists", "provider_type", &entity.provider_type)
        })?;
        let status = AvailabilityStatus::parse(&entity.status)
            .ok_or_else(|| EntityError::invalid("therapists", "status", &entity.status))?;
        Ok(Self {
            id: entity.id,
            therapist_id: entity.therapist_id,
            name: entity.name,
            provider_type,
            city: entity.city,
            country_code: entity.country_code,
            status,
            booking_enabled: entity.booking_enabled,
            schedule_enabled: entity.schedule_enabled,
            deactivation_reason: entity.deactivation_reason,
            pricing: entity.pricing,
            profile_image_url: entity.profile_image_url,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}
