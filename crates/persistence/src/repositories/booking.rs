//! Booking repository implementation.
//!
//! Status transitions are guarded in SQL: every UPDATE names the expected
//! current status in its WHERE clause, so a concurrent transition loses the
//! race cleanly instead of overwriting a newer state.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::booking::{BookingStatus, DUPLICATE_WINDOW_MINUTES};

use crate::entities::BookingEntity;

/// Input for creating a booking row. Prices arrive pre-computed.
#[derive(Debug, Clone)]
pub struct BookingInput {
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
    pub response_deadline: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Filters and cursor for listing bookings.
#[derive(Debug, Clone, Default)]
pub struct BookingListQuery {
    pub therapist_id: Option<Uuid>,
    pub customer_id: Option<String>,
    pub status: Option<BookingStatus>,
    pub before: Option<(DateTime<Utc>, i64)>,
    pub limit: i64,
}

/// Repository for booking database operations.
#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// Creates a new booking repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new booking in `pending_accept` status.
    pub async fn create(&self, input: BookingInput) -> Result<BookingEntity, sqlx::Error> {
        sqlx::query_as::<_, BookingEntity>(
            r#"
            INSERT INTO bookings (
                reference,
                customer_id,
                customer_phone,
                therapist_id,
                service_type,
                duration_minutes,
                city,
                total_price,
                admin_commission,
                provider_payout,
                discount_code_id,
                status,
                response_deadline,
                notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'pending_accept', $12, $13)
            RETURNING *
            "#,
        )
        .bind(&input.reference)
        .bind(&input.customer_id)
        .bind(&input.customer_phone)
        .bind(input.therapist_id)
        .bind(&input.service_type)
        .bind(input.duration_minutes)
        .bind(&input.city)
        .bind(input.total_price)
        .bind(input.admin_commission)
        .bind(input.provider_payout)
        .bind(input.discount_code_id)
        .bind(input.response_deadline)
        .bind(&input.notes)
        .fetch_one(&self.pool)
        .await
    }

    /// Finds a booking by its booking_id.
    pub async fn find_by_booking_id(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<BookingEntity>, sqlx::Error> {
        sqlx::query_as::<_, BookingEntity>(
            r#"
            SELECT * FROM bookings
            WHERE booking_id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Checks whether the customer already has an open booking with this
    /// provider created inside the duplicate window.
    pub async fn has_duplicate_in_window(
        &self,
        customer_id: &str,
        therapist_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE customer_id = $1
                  AND therapist_id = $2
                  AND status IN ('pending_accept', 'accepted', 'confirmed')
                  AND created_at > NOW() - make_interval(mins => $3)
            )
            "#,
        )
        .bind(customer_id)
        .bind(therapist_id)
        .bind(DUPLICATE_WINDOW_MINUTES as i32)
        .fetch_one(&self.pool)
        .await?;
        Ok(result.0)
    }

    /// Lists bookings matching the query, newest first.
    pub async fn list(&self, query: &BookingListQuery) -> Result<Vec<BookingEntity>, sqlx::Error> {
        let (before_ts, before_id) = match query.before {
            Some((ts, id)) => (Some(ts), Some(id)),
            None => (None, None),
        };
        sqlx::query_as::<_, BookingEntity>(
            r#"
            SELECT * FROM bookings
            WHERE ($1::uuid IS NULL OR therapist_id = $1)
              AND ($2::text IS NULL OR customer_id = $2)
              AND ($3::text IS NULL OR status = $3)
              AND ($4::timestamptz IS NULL OR (created_at, id) < ($4, $5))
            ORDER BY created_at DESC, id DESC
            LIMIT $6
            "#,
        )
        .bind(query.therapist_id)
        .bind(query.customer_id.as_deref())
        .bind(query.status.map(|s| s.as_str()))
        .bind(before_ts)
        .bind(before_id.unwrap_or(0))
        .bind(query.limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Moves a booking from `pending_accept` to `accepted`.
    pub async fn accept(&self, booking_id: Uuid) -> Result<Option<BookingEntity>, sqlx::Error> {
        sqlx::query_as::<_, BookingEntity>(
            r#"
            UPDATE bookings
            SET status = 'accepted', accepted_at = NOW(), updated_at = NOW()
            WHERE booking_id = $1 AND status = 'pending_accept'
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Moves a booking from `accepted` to `confirmed`.
    pub async fn confirm(&self, booking_id: Uuid) -> Result<Option<BookingEntity>, sqlx::Error> {
        sqlx::query_as::<_, BookingEntity>(
            r#"
            UPDATE bookings
            SET status = 'confirmed', confirmed_at = NOW(), updated_at = NOW()
            WHERE booking_id = $1 AND status = 'accepted'
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Moves a booking from `confirmed` to `completed`.
    pub async fn complete(&self, booking_id: Uuid) -> Result<Option<BookingEntity>, sqlx::Error> {
        sqlx::query_as::<_, BookingEntity>(
            r#"
            UPDATE bookings
            SET status = 'completed', completed_at = NOW(), updated_at = NOW()
            WHERE booking_id = $1 AND status = 'confirmed'
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Cancels a booking from any non-terminal status.
    pub async fn cancel(
        &self,
        booking_id: Uuid,
        reason: Option<&str>,
    ) -> Result<Option<BookingEntity>, sqlx::Error> {
        sqlx::query_as::<_, BookingEntity>(
            r#"
            UPDATE bookings
            SET status = 'cancelled', cancel_reason = $2, updated_at = NOW()
            WHERE booking_id = $1 AND status IN ('pending_accept', 'accepted', 'confirmed')
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .bind(reason)
        .fetch_optional(&self.pool)
        .await
    }

    /// Expires all pending bookings whose response deadline has passed.
    ///
    /// Returns the expired rows so the caller can notify customers.
    pub async fn expire_overdue_pending(&self) -> Result<Vec<BookingEntity>, sqlx::Error> {
        sqlx::query_as::<_, BookingEntity>(
            r#"
            UPDATE bookings
            SET status = 'expired', updated_at = NOW()
            WHERE status = 'pending_accept' AND response_deadline < NOW()
            RETURNING *
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Most recent commissionable bookings for the reconciliation scan
    /// window. Pending, cancelled and expired rows carry no commission and
    /// must not consume the window.
    pub async fn list_recent_commissionable(
        &self,
        limit: i64,
    ) -> Result<Vec<BookingEntity>, sqlx::Error> {
        sqlx::query_as::<_, BookingEntity>(
            r#"
            SELECT * FROM bookings
            WHERE status IN ('accepted', 'confirmed', 'completed')
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
