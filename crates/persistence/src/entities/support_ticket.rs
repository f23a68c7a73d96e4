//! Support ticket database entity.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::support_ticket::{SupportTicket, TicketPriority, TicketStatus};

use super::EntityError;

/// Database entity for support_tickets table.
#[derive(Debug, Clone, FromRow)]
pub struct SupportTicketEntity {
    pub id: i64,
    pub ticket_id: Uuid,
    pub reporter_id: String,
    pub reporter_role: String,
    pub subject: String,
    pub body: String,
    pub priority: String,
    pub status: String,
    pub resolution_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SupportTicketEntity> for SupportTicket {
    type Error = EntityError;

    fn try_from(entity: SupportTicketEntity) -> Result<Self, Self::Error> {
        let priority = TicketPriority::parse(&entity.priority)
            .ok_or_else(|| EntityError::invalid("support_tickets", "priority", &entity.priority))?;
        let status = TicketStatus::parse(&entity.status)
            .ok_or_else(|| EntityError::invalid("support_tickets", "status", &entity.status))?;
        Ok(Self {
            id: entity.id,
            ticket_id: entity.ticket_id,
            reporter_id: entity.reporter_id,
            reporter_role: entity.reporter_role,
            subject: entity.subject,
            body: entity.body,
            priority,
            status,
            resolution_note: entity.resolution_note,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}
