//! Commission record repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::commission::CommissionStatus;

use crate::entities::CommissionRecordEntity;

/// Input for creating a commission record.
#[derive(Debug, Clone)]
pub struct CommissionInput {
    pub booking_id: Uuid,
    pub therapist_id: Uuid,
    pub booking_amount: i64,
    pub commission_rate: f64,
    pub commission_amount: i64,
    pub payment_deadline: DateTime<Utc>,
}

/// Aggregated unpaid balance for a therapist.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct UnpaidSummary {
    pub unpaid_count: i64,
    pub unpaid_total: i64,
}

/// Repository for commission record database operations.
#[derive(Clone)]
pub struct CommissionRepository {
    pool: PgPool,
}

impl CommissionRepository {
    /// Creates a new commission repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a commission record in `pending` status.
    ///
    /// The UNIQUE constraint on booking_id makes this idempotent under the
    /// reconciliation job; a second insert surfaces as a database error the
    /// caller maps to a conflict.
    pub async fn create(
        &self,
        input: CommissionInput,
    ) -> Result<CommissionRecordEntity, sqlx::Error> {
        sqlx::query_as::<_, CommissionRecordEntity>(
            r#"
            INSERT INTO commission_records (
                booking_id,
                therapist_id,
                booking_amount,
                commission_rate,
                commission_amount,
                payment_deadline,
                status
            )
            VALUES ($1, $2, $3, $4, $5, $6, 'pending')
            RETURNING *
            "#,
        )
        .bind(input.booking_id)
        .bind(input.therapist_id)
        .bind(input.booking_amount)
        .bind(input.commission_rate)
        .bind(input.commission_amount)
        .bind(input.payment_deadline)
        .fetch_one(&self.pool)
        .await
    }

    /// Finds a commission record by its commission_id.
    pub async fn find_by_commission_id(
        &self,
        commission_id: Uuid,
    ) -> Result<Option<CommissionRecordEntity>, sqlx::Error> {
        sqlx::query_as::<_, CommissionRecordEntity>(
            r#"
            SELECT * FROM commission_records
            WHERE commission_id = $1
            "#,
        )
        .bind(commission_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Finds the commission record for a booking.
    pub async fn find_by_booking_id(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<CommissionRecordEntity>, sqlx::Error> {
        sqlx::query_as::<_, CommissionRecordEntity>(
            r#"
            SELECT * FROM commission_records
            WHERE booking_id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Lists commission records for a therapist, newest first.
    pub async fn list_by_therapist(
        &self,
        therapist_id: Uuid,
        status: Option<CommissionStatus>,
        limit: i64,
    ) -> Result<Vec<CommissionRecordEntity>, sqlx::Error> {
        sqlx::query_as::<_, CommissionRecordEntity>(
            r#"
            SELECT * FROM commission_records
            WHERE therapist_id = $1
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3
            "#,
        )
        .bind(therapist_id)
        .bind(status.map(|s| s.as_str()))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Lists all records awaiting admin verification.
    pub async fn list_awaiting_verification(
        &self,
        limit: i64,
    ) -> Result<Vec<CommissionRecordEntity>, sqlx::Error> {
        sqlx::query_as::<_, CommissionRecordEntity>(
            r#"
            SELECT * FROM commission_records
            WHERE status = 'awaiting_verification'
            ORDER BY proof_submitted_at ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Sums what a therapist still owes across pending and overdue records.
    pub async fn unpaid_summary(&self, therapist_id: Uuid) -> Result<UnpaidSummary, sqlx::Error> {
        sqlx::query_as::<_, UnpaidSummary>(
            r#"
            SELECT COUNT(*) AS unpaid_count,
                   COALESCE(SUM(COALESCE(total_due, commission_amount)), 0)::bigint AS unpaid_total
            FROM commission_records
            WHERE therapist_id = $1 AND status IN ('pending', 'overdue')
            "#,
        )
        .bind(therapist_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Attaches a payment proof and moves the record to verification.
    ///
    /// Returns `None` if the record is not in a status that accepts proofs.
    pub async fn submit_proof(
        &self,
        commission_id: Uuid,
        proof_url: &str,
        payment_method: &str,
    ) -> Result<Option<CommissionRecordEntity>, sqlx::Error> {
        sqlx::query_as::<_, CommissionRecordEntity>(
            r#"
            UPDATE commission_records
            SET status = 'awaiting_verification',
                payment_proof_url = $2,
                payment_method = $3,
                proof_submitted_at = NOW(),
                rejection_reason = NULL,
                updated_at = NOW()
            WHERE commission_id = $1 AND status IN ('pending', 'rejected', 'overdue')
            RETURNING *
            "#,
        )
        .bind(commission_id)
        .bind(proof_url)
        .bind(payment_method)
        .fetch_optional(&self.pool)
        .await
    }

    /// Approves a submitted proof.
    pub async fn approve(
        &self,
        commission_id: Uuid,
        verified_by: &str,
    ) -> Result<Option<CommissionRecordEntity>, sqlx::Error> {
        sqlx::query_as::<_, CommissionRecordEntity>(
            r#"
            UPDATE commission_records
            SET status = 'paid', verified_by = $2, verified_at = NOW(), updated_at = NOW()
            WHERE commission_id = $1 AND status = 'awaiting_verification'
            RETURNING *
            "#,
        )
        .bind(commission_id)
        .bind(verified_by)
        .fetch_optional(&self.pool)
        .await
    }

    /// Rejects a submitted proof with a reason.
    pub async fn reject(
        &self,
        commission_id: Uuid,
        verified_by: &str,
        reason: Option<&str>,
    ) -> Result<Option<CommissionRecordEntity>, sqlx::Error> {
        sqlx::query_as::<_, CommissionRecordEntity>(
            r#"
            UPDATE commission_records
            SET status = 'rejected',
                verified_by = $2,
                verified_at = NOW(),
                rejection_reason = $3,
                updated_at = NOW()
            WHERE commission_id = $1 AND status = 'awaiting_verification'
            RETURNING *
            "#,
        )
        .bind(commission_id)
        .bind(verified_by)
        .bind(reason)
        .fetch_optional(&self.pool)
        .await
    }

    /// Marks all pending records past their payment deadline as overdue and
    /// applies the flat late fee.
    pub async fn mark_overdue_past_deadline(
        &self,
        late_fee: i64,
    ) -> Result<Vec<CommissionRecordEntity>, sqlx::Error> {
        sqlx::query_as::<_, CommissionRecordEntity>(
            r#"
            UPDATE commission_records
            SET status = 'overdue',
                late_fee = $1,
                total_due = commission_amount + $1,
                updated_at = NOW()
            WHERE status = 'pending' AND payment_deadline < NOW()
            RETURNING *
            "#,
        )
        .bind(late_fee)
        .fetch_all(&self.pool)
        .await
    }

    /// Reverses the commission for a cancelled booking.
    ///
    /// Paid records are left alone; refunds go through support.
    pub async fn reverse_for_booking(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<CommissionRecordEntity>, sqlx::Error> {
        sqlx::query_as::<_, CommissionRecordEntity>(
            r#"
            UPDATE commission_records
            SET status = 'reversed', updated_at = NOW()
            WHERE booking_id = $1 AND status NOT IN ('paid', 'reversed')
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Most recent records for the reconciliation scan window.
    pub async fn list_recent(
        &self,
        limit: i64,
    ) -> Result<Vec<CommissionRecordEntity>, sqlx::Error> {
        sqlx::query_as::<_, CommissionRecordEntity>(
            r#"
            SELECT * FROM commission_records
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
