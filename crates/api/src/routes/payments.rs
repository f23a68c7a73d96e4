//! Payment transaction endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use domain::models::payment::{
    ListPaymentsResponse, PaymentResponse, PaymentStatus, PaymentTransaction,
    RecordPaymentRequest,
};
use persistence::repositories::{PaymentRepository, TherapistRepository};

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPaymentsQuery {
    pub therapist_id: Option<Uuid>,
    pub status: Option<PaymentStatus>,
}

/// POST /api/v1/payments
pub async fn record_payment(
    State(state): State<AppState>,
    Json(request): Json<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>), ApiError> {
    request.validate()?;

    let therapists = TherapistRepository::new(state.pool.clone());
    if therapists
        .find_by_therapist_id(request.therapist_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("Provider not found".to_string()));
    }

    let repo = PaymentRepository::new(state.pool.clone());
    let payment: PaymentTransaction = repo
        .create(
            request.therapist_id,
            request.commission_id,
            request.booking_id,
            request.amount,
            request.method,
            request.screenshot_url.as_deref(),
        )
        .await?
        .try_into()?;

    tracing::info!(
        transaction_id = %payment.transaction_id,
        therapist_id = %payment.therapist_id,
        amount = payment.amount,
        method = payment.method.as_str(),
        "Payment recorded"
    );

    Ok((StatusCode::CREATED, Json(payment.into())))
}

/// GET /api/v1/payments/:transaction_id
pub async fn get_payment(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let repo = PaymentRepository::new(state.pool.clone());
    let payment: PaymentTransaction = repo
        .find_by_transaction_id(transaction_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Payment not found".to_string()))?
        .try_into()?;
    Ok(Json(payment.into()))
}

/// GET /api/v1/payments
pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<ListPaymentsQuery>,
) -> Result<Json<ListPaymentsResponse>, ApiError> {
    let repo = PaymentRepository::new(state.pool.clone());
    let entities = repo
        .list(
            query.therapist_id,
            query.status,
            state.config.limits.max_list_limit,
        )
        .await?;

    let mut payments = Vec::with_capacity(entities.len());
    for entity in entities {
        let payment: PaymentTransaction = entity.try_into()?;
        payments.push(payment.into());
    }

    Ok(Json(ListPaymentsResponse {
        total: payments.len(),
        payments,
    }))
}
