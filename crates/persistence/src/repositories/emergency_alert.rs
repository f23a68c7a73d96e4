//! Emergency alert repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::EmergencyAlertEntity;

/// Repository for emergency alert database operations.
#[derive(Clone)]
pub struct EmergencyAlertRepository {
    pool: PgPool,
}

impl EmergencyAlertRepository {
    /// Creates a new emergency alert repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records a new alert in `pending` status.
    pub async fn create(
        &self,
        therapist_id: Uuid,
        booking_id: Option<Uuid>,
        latitude: f64,
        longitude: f64,
        note: Option<&str>,
    ) -> Result<EmergencyAlertEntity, sqlx::Error> {
        sqlx::query_as::<_, EmergencyAlertEntity>(
            r#"
            INSERT INTO emergency_alerts (
                therapist_id,
                booking_id,
                latitude,
                longitude,
                note
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(therapist_id)
        .bind(booking_id)
        .bind(latitude)
        .bind(longitude)
        .bind(note)
        .fetch_one(&self.pool)
        .await
    }

    /// Finds an alert by its alert_id.
    pub async fn find_by_alert_id(
        &self,
        alert_id: Uuid,
    ) -> Result<Option<EmergencyAlertEntity>, sqlx::Error> {
        sqlx::query_as::<_, EmergencyAlertEntity>(
            r#"
            SELECT * FROM emergency_alerts
            WHERE alert_id = $1
            "#,
        )
        .bind(alert_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Lists unacknowledged alerts, oldest first so the queue drains in order.
    pub async fn list_pending(&self, limit: i64) -> Result<Vec<EmergencyAlertEntity>, sqlx::Error> {
        sqlx::query_as::<_, EmergencyAlertEntity>(
            r#"
            SELECT * FROM emergency_alerts
            WHERE status = 'pending'
            ORDER BY created_at ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Acknowledges a pending alert. Acknowledgement is terminal, so a second
    /// call returns `None`.
    pub async fn acknowledge(
        &self,
        alert_id: Uuid,
        acknowledged_by: &str,
    ) -> Result<Option<EmergencyAlertEntity>, sqlx::Error> {
        sqlx::query_as::<_, EmergencyAlertEntity>(
            r#"
            UPDATE emergency_alerts
            SET status = 'acknowledged', acknowledged_by = $2, acknowledged_at = NOW()
            WHERE alert_id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(alert_id)
        .bind(acknowledged_by)
        .fetch_optional(&self.pool)
        .await
    }
}
