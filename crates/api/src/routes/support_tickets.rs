//! Support ticket endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use domain::models::support_ticket::{
    CreateTicketRequest, ListTicketsResponse, SupportTicket, TicketResponse, TicketStatus,
};
use persistence::repositories::SupportTicketRepository;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTicketsQuery {
    pub status: Option<TicketStatus>,
    pub reporter_id: Option<String>,
}

/// POST /api/v1/support-tickets
pub async fn create_ticket(
    State(state): State<AppState>,
    Json(request): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<TicketResponse>), ApiError> {
    request.validate()?;

    let repo = SupportTicketRepository::new(state.pool.clone());
    let ticket: SupportTicket = repo
        .create(
            &request.reporter_id,
            &request.reporter_role,
            &request.subject,
            &request.body,
            request.priority,
        )
        .await?
        .try_into()?;

    tracing::info!(
        ticket_id = %ticket.ticket_id,
        priority = ticket.priority.as_str(),
        "Support ticket opened"
    );

    Ok((StatusCode::CREATED, Json(ticket.into())))
}

/// GET /api/v1/support-tickets/:ticket_id
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<Uuid>,
) -> Result<Json<TicketResponse>, ApiError> {
    let repo = SupportTicketRepository::new(state.pool.clone());
    let ticket: SupportTicket = repo
        .find_by_ticket_id(ticket_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".to_string()))?
        .try_into()?;
    Ok(Json(ticket.into()))
}

/// GET /api/v1/support-tickets
pub async fn list_tickets(
    State(state): State<AppState>,
    Query(query): Query<ListTicketsQuery>,
) -> Result<Json<ListTicketsResponse>, ApiError> {
    let repo = SupportTicketRepository::new(state.pool.clone());
    let entities = repo
        .list(
            query.status,
            query.reporter_id.as_deref(),
            state.config.limits.max_list_limit,
        )
        .await?;

    let mut tickets = Vec::with_capacity(entities.len());
    for entity in entities {
        let ticket: SupportTicket = entity.try_into()?;
        tickets.push(ticket.into());
    }

    Ok(Json(ListTicketsResponse {
        total: tickets.len(),
        tickets,
    }))
}
