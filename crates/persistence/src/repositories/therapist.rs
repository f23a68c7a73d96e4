//! Provider repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::therapist::{AvailabilityStatus, ProviderType};

use crate::entities::TherapistEntity;

/// Repository for provider database operations.
#[derive(Clone)]
pub struct TherapistRepository {
    pool: PgPool,
}

impl TherapistRepository {
    /// Creates a new provider repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registers a new provider, offline until they set availability.
    pub async fn create(
        &self,
        name: &str,
        provider_type: ProviderType,
        city: &str,
        country_code: &str,
        pricing: Option<serde_json::Value>,
        profile_image_url: Option<&str>,
    ) -> Result<TherapistEntity, sqlx::Error> {
        sqlx::query_as::<_, TherapistEntity>(
            r#"
            INSERT INTO therapists (
                name,
                provider_type,
                city,
                country_code,
                status,
                pricing,
                profile_image_url
            )
            VALUES ($1, $2, $3, upper($4), 'offline', $5, $6)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(provider_type.as_str())
        .bind(city)
        .bind(country_code)
        .bind(pricing)
        .bind(profile_image_url)
        .fetch_one(&self.pool)
        .await
    }

    /// Finds a provider by their therapist_id.
    pub async fn find_by_therapist_id(
        &self,
        therapist_id: Uuid,
    ) -> Result<Option<TherapistEntity>, sqlx::Error> {
        sqlx::query_as::<_, TherapistEntity>(
            r#"
            SELECT * FROM therapists
            WHERE therapist_id = $1
            "#,
        )
        .bind(therapist_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Lists providers with optional filters, newest first.
    pub async fn list(
        &self,
        city: Option<&str>,
        status: Option<AvailabilityStatus>,
        provider_type: Option<ProviderType>,
        limit: i64,
    ) -> Result<Vec<TherapistEntity>, sqlx::Error> {
        sqlx::query_as::<_, TherapistEntity>(
            r#"
            SELECT * FROM therapists
            WHERE ($1::text IS NULL OR city = $1)
              AND ($2::text IS NULL OR status = $2)
              AND ($3::text IS NULL OR provider_type = $3)
            ORDER BY created_at DESC, id DESC
            LIMIT $4
            "#,
        )
        .bind(city)
        .bind(status.map(|s| s.as_str()))
        .bind(provider_type.map(|t| t.as_str()))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Partially updates a provider profile.
    pub async fn update_profile(
        &self,
        therapist_id: Uuid,
        name: Option<&str>,
        city: Option<&str>,
        pricing: Option<serde_json::Value>,
        profile_image_url: Option<&str>,
    ) -> Result<Option<TherapistEntity>, sqlx::Error> {
        sqlx::query_as::<_, TherapistEntity>(
            r#"
            UPDATE therapists
            SET
                name = COALESCE($2, name),
                city = COALESCE($3, city),
                pricing = COALESCE($4, pricing),
                profile_image_url = COALESCE($5, profile_image_url),
                updated_at = NOW()
            WHERE therapist_id = $1
            RETURNING *
            "#,
        )
        .bind(therapist_id)
        .bind(name)
        .bind(city)
        .bind(pricing)
        .bind(profile_image_url)
        .fetch_optional(&self.pool)
        .await
    }

    /// Updates provider availability.
    ///
    /// Deactivated providers cannot set themselves available; the guard on
    /// booking_enabled keeps overdue providers hidden until reactivation.
    pub async fn update_availability(
        &self,
        therapist_id: Uuid,
        status: AvailabilityStatus,
    ) -> Result<Option<TherapistEntity>, sqlx::Error> {
        sqlx::query_as::<_, TherapistEntity>(
            r#"
            UPDATE therapists
            SET status = $2, updated_at = NOW()
            WHERE therapist_id = $1
              AND (booking_enabled = TRUE OR $2 <> 'available')
            RETURNING *
            "#,
        )
        .bind(therapist_id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
    }

    /// Deactivates a provider: busy, bookings off, reason recorded.
    pub async fn deactivate(
        &self,
        therapist_id: Uuid,
        reason: &str,
    ) -> Result<Option<TherapistEntity>, sqlx::Error> {
        sqlx::query_as::<_, TherapistEntity>(
            r#"
            UPDATE therapists
            SET status = 'busy',
                booking_enabled = FALSE,
                deactivation_reason = $2,
                updated_at = NOW()
            WHERE therapist_id = $1
            RETURNING *
            "#,
        )
        .bind(therapist_id)
        .bind(reason)
        .fetch_optional(&self.pool)
        .await
    }

    /// Reactivates a deactivated provider. Admin approval only.
    pub async fn reactivate(
        &self,
        therapist_id: Uuid,
    ) -> Result<Option<TherapistEntity>, sqlx::Error> {
        sqlx::query_as::<_, TherapistEntity>(
            r#"
            UPDATE therapists
            SET status = 'available',
                booking_enabled = TRUE,
                deactivation_reason = NULL,
                updated_at = NOW()
            WHERE therapist_id = $1 AND booking_enabled = FALSE
            RETURNING *
            "#,
        )
        .bind(therapist_id)
        .fetch_optional(&self.pool)
        .await
    }
}
