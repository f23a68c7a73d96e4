//! Emergency alert database entity.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::emergency_alert::{AlertStatus, EmergencyAlert};

use super::EntityError;

/// Database entity for emergency_alerts table.
#[derive(Debug, Clone, FromRow)]
pub struct EmergencyAlertEntity {
    pub id: i64,
    pub alert_id: Uuid,
    pub therapist_id: Uuid,
    pub booking_id: Option<Uuid>,
    pub latitude: f64,
    pub longitude: f64,
    pub note: Option<String>,
    pub status: String,
    pub acknowledged_by: Option<String>,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<EmergencyAlertEntity> for EmergencyAlert {
    type Error = EntityError;

    fn try_from(entity: EmergencyAlertEntity) -> Result<Self, Self::Error> {
        let status = AlertStatus::parse(&entity.status)
            .ok_or_else(|| EntityError::invalid("emergency_alerts", "status", &entity.status))?;
        Ok(Self {
            id: entity.id,
            alert_id: entity.alert_id,
            therapist_id: entity.therapist_id,
            booking_id: entity.booking_id,
            latitude: entity.latitude,
            longitude: entity.longitude,
            note: entity.note,
            status,
            acknowledged_by: entity.acknowledged_by,
            acknowledged_at: entity.acknowledged_at,
            created_at: entity.created_at,
        })
    }
}
