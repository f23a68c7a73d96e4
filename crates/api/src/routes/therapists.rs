//! Provider endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use domain::models::therapist::{
    ListTherapistsQuery, ListTherapistsResponse, RegisterTherapistRequest, Therapist,
    TherapistResponse, UpdateAvailabilityRequest, UpdateTherapistRequest,
};
use persistence::repositories::TherapistRepository;

use crate::app::AppState;
use crate::error::ApiError;

/// POST /api/v1/therapists
pub async fn register_therapist(
    State(state): State<AppState>,
    Json(request): Json<RegisterTherapistRequest>,
) -> Result<(StatusCode, Json<TherapistResponse>), ApiError> {
    request.validate()?;

    let repo = TherapistRepository::new(state.pool.clone());
    let therapist: Therapist = repo
        .create(
            &request.name,
            request.provider_type,
            &request.city,
            &request.country_code,
            request.pricing.clone(),
            request.profile_image_url.as_deref(),
        )
        .await?
        .try_into()?;

    tracing::info!(
        therapist_id = %therapist.therapist_id,
        provider_type = therapist.provider_type.as_str(),
        city = %therapist.city,
        "Provider registered"
    );

    Ok((StatusCode::CREATED, Json(therapist.into())))
}

/// GET /api/v1/therapists/:therapist_id
pub async fn get_therapist(
    State(state): State<AppState>,
    Path(therapist_id): Path<Uuid>,
) -> Result<Json<TherapistResponse>, ApiError> {
    let repo = TherapistRepository::new(state.pool.clone());
    let therapist: Therapist = repo
        .find_by_therapist_id(therapist_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Provider not found".to_string()))?
        .try_into()?;
    Ok(Json(therapist.into()))
}

/// GET /api/v1/therapists
pub async fn list_therapists(
    State(state): State<AppState>,
    Query(query): Query<ListTherapistsQuery>,
) -> Result<Json<ListTherapistsResponse>, ApiError> {
    let repo = TherapistRepository::new(state.pool.clone());
    let entities = repo
        .list(
            query.city.as_deref(),
            query.status,
            query.provider_type,
            state.config.limits.max_list_limit,
        )
        .await?;

    let mut therapists = Vec::with_capacity(entities.len());
    for entity in entities {
        let therapist: Therapist = entity.try_into()?;
        therapists.push(therapist.into());
    }

    Ok(Json(ListTherapistsResponse {
        total: therapists.len(),
        therapists,
    }))
}

/// PUT /api/v1/therapists/:therapist_id
pub async fn update_therapist(
    State(state): State<AppState>,
    Path(therapist_id): Path<Uuid>,
    Json(request): Json<UpdateTherapistRequest>,
) -> Result<Json<TherapistResponse>, ApiError> {
    request.validate()?;

    let repo = TherapistRepository::new(state.pool.clone());
    let therapist: Therapist = repo
        .update_profile(
            therapist_id,
            request.name.as_deref(),
            request.city.as_deref(),
            request.pricing.clone(),
            request.profile_image_url.as_deref(),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Provider not found".to_string()))?
        .try_into()?;
    Ok(Json(therapist.into()))
}

/// PUT /api/v1/therapists/:therapist_id/availability
///
/// A deactivated provider can go busy or offline but not available; that
/// path returns 409 until an admin reactivates them.
pub async fn update_availability(
    State(state): State<AppState>,
    Path(therapist_id): Path<Uuid>,
    Json(request): Json<UpdateAvailabilityRequest>,
) -> Result<Json<TherapistResponse>, ApiError> {
    let repo = TherapistRepository::new(state.pool.clone());
    let updated = repo.update_availability(therapist_id, request.status).await?;

    let therapist: Therapist = match updated {
        Some(entity) => entity.try_into()?,
        None => {
            return match repo.find_by_therapist_id(therapist_id).await? {
                Some(_) => Err(ApiError::Conflict(
                    "Provider is deactivated and cannot go available".to_string(),
                )),
                None => Err(ApiError::NotFound("Provider not found".to_string())),
            };
        }
    };

    tracing::info!(
        therapist_id = %therapist.therapist_id,
        status = therapist.status.as_str(),
        "Provider availability updated"
    );

    Ok(Json(therapist.into()))
}
