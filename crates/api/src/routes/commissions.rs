//! Commission endpoint handlers for the provider side.
//!
//! Admin verification lives in the admin routes; here providers look up
//! what they owe and submit payment proofs.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use domain::models::commission::{
    CommissionRecord, CommissionResponse, CommissionStatus, ListCommissionsResponse,
    SubmitProofRequest, UnpaidSummaryResponse,
};
use persistence::repositories::CommissionRepository;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCommissionsQuery {
    pub status: Option<CommissionStatus>,
}

/// GET /api/v1/commissions/:commission_id
pub async fn get_commission(
    State(state): State<AppState>,
    Path(commission_id): Path<Uuid>,
) -> Result<Json<CommissionResponse>, ApiError> {
    let repo = CommissionRepository::new(state.pool.clone());
    let record: CommissionRecord = repo
        .find_by_commission_id(commission_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Commission record not found".to_string()))?
        .try_into()?;
    Ok(Json(record.into()))
}

/// GET /api/v1/therapists/:therapist_id/commissions
pub async fn list_commissions(
    State(state): State<AppState>,
    Path(therapist_id): Path<Uuid>,
    Query(query): Query<ListCommissionsQuery>,
) -> Result<Json<ListCommissionsResponse>, ApiError> {
    let repo = CommissionRepository::new(state.pool.clone());
    let entities = repo
        .list_by_therapist(therapist_id, query.status, state.config.limits.max_list_limit)
        .await?;

    let mut commissions = Vec::with_capacity(entities.len());
    for entity in entities {
        let record: CommissionRecord = entity.try_into()?;
        commissions.push(record.into());
    }

    Ok(Json(ListCommissionsResponse {
        total: commissions.len(),
        commissions,
    }))
}

/// GET /api/v1/therapists/:therapist_id/commissions/unpaid
pub async fn unpaid_summary(
    State(state): State<AppState>,
    Path(therapist_id): Path<Uuid>,
) -> Result<Json<UnpaidSummaryResponse>, ApiError> {
    let repo = CommissionRepository::new(state.pool.clone());
    let summary = repo.unpaid_summary(therapist_id).await?;

    Ok(Json(UnpaidSummaryResponse {
        therapist_id,
        unpaid_count: summary.unpaid_count as usize,
        unpaid_total: summary.unpaid_total,
    }))
}

/// POST /api/v1/commissions/:commission_id/proof
///
/// Accepted from pending, rejected and overdue records. A proof already
/// under review cannot be replaced.
pub async fn submit_proof(
    State(state): State<AppState>,
    Path(commission_id): Path<Uuid>,
    Json(request): Json<SubmitProofRequest>,
) -> Result<Json<CommissionResponse>, ApiError> {
    request.validate()?;

    let repo = CommissionRepository::new(state.pool.clone());
    let updated = repo
        .submit_proof(commission_id, &request.proof_url, &request.payment_method)
        .await?;

    let record: CommissionRecord = match updated {
        Some(entity) => entity.try_into()?,
        None => {
            return match repo.find_by_commission_id(commission_id).await? {
                Some(entity) => Err(ApiError::Conflict(format!(
                    "Proof cannot be submitted while the commission is {}",
                    entity.status
                ))),
                None => Err(ApiError::NotFound("Commission record not found".to_string())),
            };
        }
    };

    tracing::info!(
        commission_id = %record.commission_id,
        therapist_id = %record.therapist_id,
        "Payment proof submitted"
    );

    Ok(Json(record.into()))
}
