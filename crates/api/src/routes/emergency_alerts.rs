//! Emergency alert endpoint handlers.
//!
//! Only the trigger lives on the provider surface. The pending queue and
//! acknowledgement are admin operations.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use validator::Validate;

use domain::models::emergency_alert::{AlertResponse, EmergencyAlert, TriggerAlertRequest};
use persistence::repositories::{EmergencyAlertRepository, TherapistRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics;

/// POST /api/v1/emergency-alerts
pub async fn trigger_alert(
    State(state): State<AppState>,
    Json(request): Json<TriggerAlertRequest>,
) -> Result<(StatusCode, Json<AlertResponse>), ApiError> {
    request.validate()?;

    let therapists = TherapistRepository::new(state.pool.clone());
    if therapists
        .find_by_therapist_id(request.therapist_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("Provider not found".to_string()));
    }

    let repo = EmergencyAlertRepository::new(state.pool.clone());
    let alert: EmergencyAlert = repo
        .create(
            request.therapist_id,
            request.booking_id,
            request.latitude,
            request.longitude,
            request.note.as_deref(),
        )
        .await?
        .try_into()?;

    metrics::record_emergency_alert();
    state.notifier.dispatch(
        "emergency.triggered",
        json!({
            "alertId": alert.alert_id,
            "therapistId": alert.therapist_id,
            "latitude": alert.latitude,
            "longitude": alert.longitude,
        }),
    );

    tracing::warn!(
        alert_id = %alert.alert_id,
        therapist_id = %alert.therapist_id,
        "Emergency alert triggered"
    );

    Ok((StatusCode::CREATED, Json(alert.into())))
}
