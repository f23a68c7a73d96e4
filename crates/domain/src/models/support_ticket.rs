//! Support ticket domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Ticket status flow: open → in_progress → resolved → closed.
/// A resolved ticket may be reopened to in_progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(TicketStatus::Open),
            "in_progress" => Some(TicketStatus::InProgress),
            "resolved" => Some(TicketStatus::Resolved),
            "closed" => Some(TicketStatus::Closed),
            _ => None,
        }
    }

    pub fn can_transition_to(&self, next: TicketStatus) -> bool {
        match self {
            TicketStatus::Open => matches!(next, TicketStatus::InProgress | TicketStatus::Closed),
            TicketStatus::InProgress => {
                matches!(next, TicketStatus::Resolved | TicketStatus::Closed)
            }
            TicketStatus::Resolved => {
                matches!(next, TicketStatus::InProgress | TicketStatus::Closed)
            }
            TicketStatus::Closed => false,
        }
    }
}

/// Ticket priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    Normal,
    High,
    Urgent,
}

impl TicketPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketPriority::Low => "low",
            TicketPriority::Normal => "normal",
            TicketPriority::High => "high",
            TicketPriority::Urgent => "urgent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(TicketPriority::Low),
            "normal" => Some(TicketPriority::Normal),
            "high" => Some(TicketPriority::High),
            "urgent" => Some(TicketPriority::Urgent),
            _ => None,
        }
    }
}

/// A support ticket raised by a customer or provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    pub id: i64,
    pub ticket_id: Uuid,
    pub reporter_id: String,
    /// "customer", "therapist" or "admin".
    pub reporter_role: String,
    pub subject: String,
    pub body: String,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub resolution_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a ticket.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    #[validate(length(min = 1, max = 64, message = "Reporter ID is required"))]
    pub reporter_id: String,

    #[validate(length(min = 1, max = 20, message = "Reporter role is required"))]
    pub reporter_role: String,

    #[validate(length(min = 1, max = 200, message = "Subject is required"))]
    pub subject: String,

    #[validate(length(min = 1, max = 5000, message = "Body is required"))]
    pub body: String,

    #[serde(default = "default_priority")]
    pub priority: TicketPriority,
}

fn default_priority() -> TicketPriority {
    TicketPriority::Normal
}

/// Request payload for updating ticket status.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketRequest {
    pub status: TicketStatus,

    #[validate(length(max = 2000, message = "Note must be at most 2000 characters"))]
    pub resolution_note: Option<String>,
}

/// Response payload for ticket operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    pub ticket_id: Uuid,
    pub reporter_id: String,
    pub reporter_role: String,
    pub subject: String,
    pub body: String,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SupportTicket> for TicketResponse {
    fn from(t: SupportTicket) -> Self {
        Self {
            ticket_id: t.ticket_id,
            reporter_id: t.reporter_id,
            reporter_role: t.reporter_role,
            subject: t.subject,
            body: t.body,
            priority: t.priority,
            status: t.status,
            resolution_note: t.resolution_note,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// Response for listing tickets.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTicketsResponse {
    pub tickets: Vec<TicketResponse>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for s in [
            TicketStatus::Open,
            TicketStatus::InProgress,
            TicketStatus::Resolved,
            TicketStatus::Closed,
        ] {
            assert_eq!(TicketStatus::parse(s.as_str()), Some(s));
        }
    }

    #[test]
    fn test_status_flow() {
        assert!(TicketStatus::Open.can_transition_to(TicketStatus::InProgress));
        assert!(TicketStatus::InProgress.can_transition_to(TicketStatus::Resolved));
        assert!(TicketStatus::Resolved.can_transition_to(TicketStatus::Closed));
        // Reopen path
        assert!(TicketStatus::Resolved.can_transition_to(TicketStatus::InProgress));
        // Closed is terminal
        assert!(!TicketStatus::Closed.can_transition_to(TicketStatus::Open));
        assert!(!TicketStatus::Closed.can_transition_to(TicketStatus::InProgress));
        // No skipping
        assert!(!TicketStatus::Open.can_transition_to(TicketStatus::Resolved));
    }

    #[test]
    fn test_priority_roundtrip() {
        for p in [
            TicketPriority::Low,
            TicketPriority::Normal,
            TicketPriority::High,
            TicketPriority::Urgent,
        ] {
            assert_eq!(TicketPriority::parse(p.as_str()), Some(p));
        }
    }

    #[test]
    fn test_create_request_defaults_to_normal_priority() {
        let json = r#"{
            "reporterId": "cust_8821",
            "reporterRole": "customer",
            "subject": "Refund request",
            "body": "My booking was cancelled but I was still charged."
        }"#;
        let request: CreateTicketRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.priority, TicketPriority::Normal);
        assert!(request.validate().is_ok());
    }
}
