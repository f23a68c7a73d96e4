//! Payment transaction repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::payment::{PaymentMethod, PaymentStatus};

use crate::entities::PaymentTransactionEntity;

/// Repository for payment transaction database operations.
#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records a payment in `pending` status.
    pub async fn create(
        &self,
        therapist_id: Uuid,
        commission_id: Option<Uuid>,
        booking_id: Option<Uuid>,
        amount: i64,
        method: PaymentMethod,
        screenshot_url: Option<&str>,
    ) -> Result<PaymentTransactionEntity, sqlx::Error> {
        sqlx::query_as::<_, PaymentTransactionEntity>(
            r#"
            INSERT INTO payment_transactions (
                therapist_id,
                commission_id,
                booking_id,
                amount,
                method,
                screenshot_url
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(therapist_id)
        .bind(commission_id)
        .bind(booking_id)
        .bind(amount)
        .bind(method.as_str())
        .bind(screenshot_url)
        .fetch_one(&self.pool)
        .await
    }

    /// Finds a transaction by its transaction_id.
    pub async fn find_by_transaction_id(
        &self,
        transaction_id: Uuid,
    ) -> Result<Option<PaymentTransactionEntity>, sqlx::Error> {
        sqlx::query_as::<_, PaymentTransactionEntity>(
            r#"
            SELECT * FROM payment_transactions
            WHERE transaction_id = $1
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Lists transactions, newest first.
    pub async fn list(
        &self,
        therapist_id: Option<Uuid>,
        status: Option<PaymentStatus>,
        limit: i64,
    ) -> Result<Vec<PaymentTransactionEntity>, sqlx::Error> {
        sqlx::query_as::<_, PaymentTransactionEntity>(
            r#"
            SELECT * FROM payment_transactions
            WHERE ($1::uuid IS NULL OR therapist_id = $1)
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

    /// Settles a pending transaction. Settled transactions are immutable, so
    /// a repeat review returns `None`.
    pub async fn review(
        &self,
        transaction_id: Uuid,
        approved: bool,
        reviewed_by: &str,
    ) -> Result<Option<PaymentTransactionEntity>, sqlx::Error> {
        let status = if approved { "verified" } else { "rejected" };
        sqlx::query_as::<_, PaymentTransactionEntity>(
            r#"
            UPDATE payment_transactions
            SET status = $2, reviewed_by = $3, reviewed_at = NOW()
            WHERE transaction_id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(transaction_id)
        .bind(status)
        .bind(reviewed_by)
        .fetch_optional(&self.pool)
        .await
    }
}
