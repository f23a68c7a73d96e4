//! Discount code endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use domain::models::discount_code::{
    DiscountCode, DiscountCodeResponse, DiscountStatsResponse, GenerateDiscountRequest,
    RedeemDiscountRequest,
};
use domain::services::pricing::{self, PriceQuote};
use persistence::repositories::{DiscountCodeRepository, GenerateOutcome, TherapistRepository};
use shared::codes::generate_discount_code;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics;

/// Response for a validation preview. No state changes; redemption only
/// happens through booking creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCodeResponse {
    pub valid: bool,
    pub code: DiscountCodeResponse,
    pub quote: PriceQuote,
}

/// POST /api/v1/discount-codes
///
/// Issuing is idempotent per therapist-customer pair: if an active code
/// already exists it is returned with 200 instead of creating a second.
pub async fn generate_code(
    State(state): State<AppState>,
    Json(request): Json<GenerateDiscountRequest>,
) -> Result<(StatusCode, Json<DiscountCodeResponse>), ApiError> {
    request.validate()?;

    let therapists = TherapistRepository::new(state.pool.clone());
    if therapists
        .find_by_therapist_id(request.therapist_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("Provider not found".to_string()));
    }

    let now = Utc::now();
    let repo = DiscountCodeRepository::new(state.pool.clone());
    let outcome = repo
        .generate(
            request.therapist_id,
            &request.customer_id,
            &generate_discount_code(),
            request.percentage as i16,
            &request.source,
            DiscountCode::expiry_from(now),
        )
        .await?;

    let (status, entity) = match outcome {
        GenerateOutcome::Created(entity) => {
            metrics::record_discount_code_issued();
            tracing::info!(
                therapist_id = %request.therapist_id,
                percentage = request.percentage,
                "Discount code issued"
            );
            (StatusCode::CREATED, entity)
        }
        GenerateOutcome::ActiveCodeExists(entity) => (StatusCode::OK, entity),
    };

    let code: DiscountCode = entity.try_into()?;
    Ok((status, Json(DiscountCodeResponse::from_code(code, now))))
}

/// POST /api/v1/discount-codes/validate
///
/// Dry-run check with a price quote. Rejections surface the specific
/// reason so the client can show it to the customer.
pub async fn validate_code(
    State(state): State<AppState>,
    Json(request): Json<RedeemDiscountRequest>,
) -> Result<Json<ValidateCodeResponse>, ApiError> {
    request.validate()?;

    let now = Utc::now();
    let repo = DiscountCodeRepository::new(state.pool.clone());
    let code: DiscountCode = repo
        .find_by_code(&request.code)
        .await?
        .ok_or_else(|| ApiError::NotFound("Discount code not found".to_string()))?
        .try_into()?;

    code.validate_for(request.therapist_id, &request.customer_id, now)?;

    let quote = pricing::discount_quote(request.amount, code.percentage);
    Ok(Json(ValidateCodeResponse {
        valid: true,
        code: DiscountCodeResponse::from_code(code, now),
        quote,
    }))
}

/// GET /api/v1/therapists/:therapist_id/discount-codes
pub async fn list_codes(
    State(state): State<AppState>,
    Path(therapist_id): Path<Uuid>,
) -> Result<Json<Vec<DiscountCodeResponse>>, ApiError> {
    let repo = DiscountCodeRepository::new(state.pool.clone());
    let entities = repo
        .list_by_therapist(therapist_id, state.config.limits.max_list_limit)
        .await?;

    let now = Utc::now();
    let mut codes = Vec::with_capacity(entities.len());
    for entity in entities {
        let code: DiscountCode = entity.try_into()?;
        codes.push(DiscountCodeResponse::from_code(code, now));
    }
    Ok(Json(codes))
}

/// GET /api/v1/therapists/:therapist_id/discount-codes/stats
pub async fn code_stats(
    State(state): State<AppState>,
    Path(therapist_id): Path<Uuid>,
) -> Result<Json<DiscountStatsResponse>, ApiError> {
    let repo = DiscountCodeRepository::new(state.pool.clone());
    let stats = repo.stats_for_therapist(therapist_id).await?;

    Ok(Json(DiscountStatsResponse {
        therapist_id,
        total_sent: stats.total_sent as usize,
        active: stats.active as usize,
        used: stats.used as usize,
        expired: stats.expired as usize,
    }))
}
