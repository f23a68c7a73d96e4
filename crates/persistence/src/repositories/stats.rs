//! Aggregate queries backing the admin platform stats endpoint.

use sqlx::PgPool;

/// Row count per status value.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Commission amount totals split by settlement state.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct CommissionTotals {
    pub pending_amount: i64,
    pub paid_amount: i64,
    pub overdue_amount: i64,
}

/// Repository for cross-aggregate platform statistics.
#[derive(Clone)]
pub struct StatsRepository {
    pool: PgPool,
}

impl StatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Provider counts grouped by availability status.
    pub async fn therapists_by_status(&self) -> Result<Vec<StatusCount>, sqlx::Error> {
        sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM therapists
            GROUP BY status
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Booking counts grouped by status.
    pub async fn bookings_by_status(&self) -> Result<Vec<StatusCount>, sqlx::Error> {
        sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM bookings
            GROUP BY status
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Commission amount totals for pending, paid and overdue records.
    ///
    /// Overdue totals include the late fee once applied.
    pub async fn commission_totals(&self) -> Result<CommissionTotals, sqlx::Error> {
        sqlx::query_as::<_, CommissionTotals>(
            r#"
            SELECT
                COALESCE(SUM(commission_amount) FILTER (WHERE status = 'pending'), 0)::bigint
                    AS pending_amount,
                COALESCE(SUM(commission_amount) FILTER (WHERE status = 'paid'), 0)::bigint
                    AS paid_amount,
                COALESCE(SUM(COALESCE(total_due, commission_amount))
                    FILTER (WHERE status = 'overdue'), 0)::bigint AS overdue_amount
            FROM commission_records
            "#,
        )
        .fetch_one(&self.pool)
        .await
    }

    /// Tickets still being worked (open or in progress).
    pub async fn open_tickets(&self) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM support_tickets
            WHERE status IN ('open', 'in_progress')
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Emergency alerts nobody has acknowledged yet.
    pub async fn pending_alerts(&self) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM emergency_alerts
            WHERE status = 'pending'
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
