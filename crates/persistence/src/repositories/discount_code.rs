//! Discount code repository implementation.
//!
//! Generation serializes on a per-pair advisory lock inside a transaction,
//! so two concurrent sends to the same customer cannot both create an
//! active code.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use shared::crypto::advisory_lock_key;

use crate::entities::DiscountCodeEntity;

/// Result of a code generation attempt.
#[derive(Debug, Clone)]
pub enum GenerateOutcome {
    Created(DiscountCodeEntity),
    /// The pair already holds an unused, unexpired code.
    ActiveCodeExists(DiscountCodeEntity),
}

/// Per-therapist issuance counters.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct DiscountStats {
    pub total_sent: i64,
    pub active: i64,
    pub used: i64,
    pub expired: i64,
}

/// Repository for discount code database operations.
#[derive(Clone)]
pub struct DiscountCodeRepository {
    pool: PgPool,
}

impl DiscountCodeRepository {
    /// Creates a new discount code repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Generates a code for a therapist-customer pair.
    ///
    /// Runs in a transaction holding a per-pair advisory lock; if an active
    /// code exists it is returned instead of inserting a second.
    pub async fn generate(
        &self,
        therapist_id: Uuid,
        customer_id: &str,
        code: &str,
        percentage: i16,
        source: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<GenerateOutcome, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // A row lock cannot serialize this check when the pair has no
        // active code yet, so the pair itself is the lock. Released on
        // commit or rollback.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(advisory_lock_key(
                &therapist_id.to_string(),
                customer_id,
            ))
            .execute(&mut *tx)
            .await?;

        let existing = sqlx::query_as::<_, DiscountCodeEntity>(
            r#"
            SELECT * FROM discount_codes
            WHERE therapist_id = $1
              AND customer_id = $2
              AND is_used = FALSE
              AND expires_at > NOW()
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(therapist_id)
        .bind(customer_id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(entity) = existing {
            tx.commit().await?;
            return Ok(GenerateOutcome::ActiveCodeExists(entity));
        }

        let created = sqlx::query_as::<_, DiscountCodeEntity>(
            r#"
            INSERT INTO discount_codes (
                code,
                therapist_id,
                customer_id,
                percentage,
                source,
                expires_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(code)
        .bind(therapist_id)
        .bind(customer_id)
        .bind(percentage)
        .bind(source)
        .bind(expires_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(GenerateOutcome::Created(created))
    }

    /// Finds a code by its customer-facing string.
    pub async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<Option<DiscountCodeEntity>, sqlx::Error> {
        sqlx::query_as::<_, DiscountCodeEntity>(
            r#"
            SELECT * FROM discount_codes
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
    }

    /// Marks a code used by a booking.
    ///
    /// The `is_used = FALSE` guard makes redemption first-wins under
    /// concurrency; the loser gets `None`.
    pub async fn mark_used(
        &self,
        code_id: Uuid,
        booking_id: Uuid,
    ) -> Result<Option<DiscountCodeEntity>, sqlx::Error> {
        sqlx::query_as::<_, DiscountCodeEntity>(
            r#"
            UPDATE discount_codes
            SET is_used = TRUE, used_at = NOW(), used_booking_id = $2
            WHERE code_id = $1 AND is_used = FALSE
            RETURNING *
            "#,
        )
        .bind(code_id)
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Lists codes issued by a therapist, newest first.
    pub async fn list_by_therapist(
        &self,
        therapist_id: Uuid,
        limit: i64,
    ) -> Result<Vec<DiscountCodeEntity>, sqlx::Error> {
        sqlx::query_as::<_, DiscountCodeEntity>(
            r#"
            SELECT * FROM discount_codes
            WHERE therapist_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(therapist_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Issuance counters for a therapist.
    pub async fn stats_for_therapist(
        &self,
        therapist_id: Uuid,
    ) -> Result<DiscountStats, sqlx::Error> {
        sqlx::query_as::<_, DiscountStats>(
            r#"
            SELECT COUNT(*) AS total_sent,
                   COUNT(*) FILTER (WHERE NOT is_used AND expires_at > NOW()) AS active,
                   COUNT(*) FILTER (WHERE is_used) AS used,
                   COUNT(*) FILTER (WHERE NOT is_used AND expires_at <= NOW()) AS expired
            FROM discount_codes
            WHERE therapist_id = $1
            "#,
        )
        .bind(therapist_id)
        .fetch_one(&self.pool)
        .await
    }
}
