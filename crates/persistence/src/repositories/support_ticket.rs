//! Support ticket repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::support_ticket::{TicketPriority, TicketStatus};

use crate::entities::SupportTicketEntity;

/// Repository for support ticket database operations.
#[derive(Clone)]
pub struct SupportTicketRepository {
    pool: PgPool,
}

impl SupportTicketRepository {
    /// Creates a new support ticket repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a new ticket.
    pub async fn create(
        &self,
        reporter_id: &str,
        reporter_role: &str,
        subject: &str,
        body: &str,
        priority: TicketPriority,
    ) -> Result<SupportTicketEntity, sqlx::Error> {
        sqlx::query_as::<_, SupportTicketEntity>(
            r#"
            INSERT INTO support_tickets (
                reporter_id,
                reporter_role,
                subject,
                body,
                priority
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(reporter_id)
        .bind(reporter_role)
        .bind(subject)
        .bind(body)
        .bind(priority.as_str())
        .fetch_one(&self.pool)
        .await
    }

    /// Finds a ticket by its ticket_id.
    pub async fn find_by_ticket_id(
        &self,
        ticket_id: Uuid,
    ) -> Result<Option<SupportTicketEntity>, sqlx::Error> {
        sqlx::query_as::<_, SupportTicketEntity>(
            r#"
            SELECT * FROM support_tickets
            WHERE ticket_id = $1
            "#,
        )
        .bind(ticket_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Lists tickets, urgent first within equal age.
    pub async fn list(
        &self,
        status: Option<TicketStatus>,
        reporter_id: Option<&str>,
        limit: i64,
    ) -> Result<Vec<SupportTicketEntity>, sqlx::Error> {
        sqlx::query_as::<_, SupportTicketEntity>(
            r#"
            SELECT * FROM support_tickets
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::text IS NULL OR reporter_id = $2)
            ORDER BY
                CASE priority
                    WHEN 'urgent' THEN 0
                    WHEN 'high' THEN 1
                    WHEN 'normal' THEN 2
                    ELSE 3
                END,
                created_at ASC
            LIMIT $3
            "#,
        )
        .bind(status.map(|s| s.as_str()))
        .bind(reporter_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Moves a ticket to a new status. The caller validates the transition;
    /// this only refuses updates to closed tickets.
    pub async fn update_status(
        &self,
        ticket_id: Uuid,
        status: TicketStatus,
        resolution_note: Option<&str>,
    ) -> Result<Option<SupportTicketEntity>, sqlx::Error> {
        sqlx::query_as::<_, SupportTicketEntity>(
            r#"
            UPDATE support_tickets
            SET status = $2,
                resolution_note = COALESCE($3, resolution_note),
                updated_at = NOW()
            WHERE ticket_id = $1 AND status <> 'closed'
            RETURNING *
            "#,
        )
        .bind(ticket_id)
        .bind(status.as_str())
        .bind(resolution_note)
        .fetch_optional(&self.pool)
        .await
    }
}
