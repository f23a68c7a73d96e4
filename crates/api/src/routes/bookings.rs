//! Booking endpoint handlers.
//!
//! The create flow prices the booking server-side: discount first, then the
//! commission split on the discounted price. Clients never send computed
//! amounts.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use domain::models::booking::{
    Booking, BookingResponse, CancelBookingRequest, CreateBookingRequest, ListBookingsQuery,
    ListBookingsResponse, RESPONSE_TIMEOUT_MINUTES,
};
use domain::models::commission::PAYMENT_DEADLINE_HOURS;
use domain::models::discount_code::{DiscountCode, DiscountRejection};
use domain::models::therapist::Therapist;
use domain::services::pricing;
use persistence::repositories::{
    BookingInput, BookingListQuery, BookingRepository, CommissionInput, CommissionRepository,
    DiscountCodeRepository, TherapistRepository,
};
use shared::codes::generate_booking_reference;
use shared::pagination::{decode_cursor, encode_cursor};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics;

/// POST /api/v1/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    request.validate()?;

    let therapists = TherapistRepository::new(state.pool.clone());
    let therapist: Therapist = therapists
        .find_by_therapist_id(request.therapist_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Provider not found".to_string()))?
        .try_into()?;

    if !therapist.is_bookable() {
        return Err(ApiError::Conflict(
            "Provider is not accepting bookings".to_string(),
        ));
    }

    // Providers with an outstanding commission balance cannot take new work.
    let commissions = CommissionRepository::new(state.pool.clone());
    let unpaid = commissions.unpaid_summary(request.therapist_id).await?;
    if unpaid.unpaid_count > 0 {
        return Err(ApiError::Conflict(
            "Provider has unpaid commissions and cannot accept bookings".to_string(),
        ));
    }

    let bookings = BookingRepository::new(state.pool.clone());
    if bookings
        .has_duplicate_in_window(&request.customer_id, request.therapist_id)
        .await?
    {
        return Err(ApiError::Conflict(
            "An open booking with this provider already exists".to_string(),
        ));
    }

    // Resolve the discount before pricing so an invalid code fails the whole
    // request instead of silently charging full price.
    let discounts = DiscountCodeRepository::new(state.pool.clone());
    let discount: Option<DiscountCode> = match &request.discount_code {
        Some(code) => {
            let entity = discounts
                .find_by_code(code)
                .await?
                .ok_or(DiscountRejection::NotFound)?;
            let code: DiscountCode = entity.try_into()?;
            code.validate_for(request.therapist_id, &request.customer_id, Utc::now())?;
            Some(code)
        }
        None => None,
    };

    let quote = match &discount {
        Some(code) => pricing::discount_quote(request.price, code.percentage),
        None => pricing::discount_quote(request.price, 0),
    };

    let now = Utc::now();
    let input = BookingInput {
        reference: generate_booking_reference(now.timestamp_millis()),
        customer_id: request.customer_id.clone(),
        customer_phone: request.customer_phone.clone(),
        therapist_id: request.therapist_id,
        service_type: request.service_type.clone(),
        duration_minutes: request.duration_minutes,
        city: request.city.clone(),
        total_price: quote.discounted_price,
        admin_commission: quote.admin_commission,
        provider_payout: quote.provider_payout,
        discount_code_id: discount.as_ref().map(|d| d.code_id),
        response_deadline: now + Duration::minutes(RESPONSE_TIMEOUT_MINUTES),
        notes: request.notes.clone(),
    };

    let booking: Booking = bookings.create(input).await?.try_into()?;

    // Redemption is first-wins: if a concurrent booking consumed the code
    // between validation and here, roll this booking back.
    if let Some(code) = &discount {
        let marked = discounts.mark_used(code.code_id, booking.booking_id).await?;
        if marked.is_none() {
            bookings
                .cancel(booking.booking_id, Some("discount code already used"))
                .await?;
            return Err(DiscountRejection::AlreadyUsed.into());
        }
        metrics::record_discount_code_redeemed();
    }

    metrics::record_booking_created();
    state.notifier.dispatch(
        "booking.created",
        json!({
            "bookingId": booking.booking_id,
            "therapistId": booking.therapist_id,
            "responseDeadline": booking.response_deadline,
        }),
    );

    tracing::info!(
        booking_id = %booking.booking_id,
        reference = %booking.reference,
        therapist_id = %booking.therapist_id,
        total_price = booking.total_price,
        "Booking created"
    );

    Ok((StatusCode::CREATED, Json(booking.into())))
}

/// GET /api/v1/bookings/:booking_id
pub async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let repo = BookingRepository::new(state.pool.clone());
    let booking: Booking = repo
        .find_by_booking_id(booking_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?
        .try_into()?;
    Ok(Json(booking.into()))
}

/// GET /api/v1/bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<ListBookingsResponse>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(state.config.limits.default_list_limit)
        .clamp(1, state.config.limits.max_list_limit);

    let before = match &query.cursor {
        Some(cursor) => Some(
            decode_cursor(cursor)
                .map_err(|e| ApiError::Validation(format!("Invalid cursor: {}", e)))?,
        ),
        None => None,
    };

    let repo = BookingRepository::new(state.pool.clone());
    let entities = repo
        .list(&BookingListQuery {
            therapist_id: query.therapist_id,
            customer_id: query.customer_id.clone(),
            status: query.status,
            before,
            // Fetch one extra row to detect whether another page exists
            limit: limit + 1,
        })
        .await?;

    let has_more = entities.len() as i64 > limit;
    let mut bookings: Vec<Booking> = Vec::with_capacity(entities.len().min(limit as usize));
    for entity in entities.into_iter().take(limit as usize) {
        bookings.push(entity.try_into()?);
    }

    let next_cursor = if has_more {
        bookings.last().map(|b| encode_cursor(b.created_at, b.id))
    } else {
        None
    };

    let responses: Vec<BookingResponse> = bookings.into_iter().map(Into::into).collect();
    Ok(Json(ListBookingsResponse {
        total: responses.len(),
        bookings: responses,
        next_cursor,
    }))
}

/// POST /api/v1/bookings/:booking_id/accept
///
/// Acceptance creates the commission record. The two writes are not atomic;
/// the reconciliation job backfills a commission if the second write is lost.
pub async fn accept_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let bookings = BookingRepository::new(state.pool.clone());
    let booking: Booking = match bookings.accept(booking_id).await? {
        Some(entity) => entity.try_into()?,
        None => return Err(transition_error(&bookings, booking_id, "accepted").await),
    };

    let commissions = CommissionRepository::new(state.pool.clone());
    let created = commissions
        .create(CommissionInput {
            booking_id: booking.booking_id,
            therapist_id: booking.therapist_id,
            booking_amount: booking.total_price,
            commission_rate: pricing::COMMISSION_RATE,
            commission_amount: booking.admin_commission,
            payment_deadline: Utc::now() + Duration::hours(PAYMENT_DEADLINE_HOURS),
        })
        .await;

    if let Err(e) = created {
        // Leave the booking accepted; reconciliation will create the record
        tracing::error!(
            booking_id = %booking.booking_id,
            error = %e,
            "Failed to create commission record on acceptance"
        );
    }

    state.notifier.dispatch(
        "booking.accepted",
        json!({
            "bookingId": booking.booking_id,
            "customerId": booking.customer_id,
        }),
    );

    Ok(Json(booking.into()))
}

/// POST /api/v1/bookings/:booking_id/confirm
pub async fn confirm_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let repo = BookingRepository::new(state.pool.clone());
    let booking: Booking = match repo.confirm(booking_id).await? {
        Some(entity) => entity.try_into()?,
        None => return Err(transition_error(&repo, booking_id, "confirmed").await),
    };
    Ok(Json(booking.into()))
}

/// POST /api/v1/bookings/:booking_id/complete
pub async fn complete_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let repo = BookingRepository::new(state.pool.clone());
    let booking: Booking = match repo.complete(booking_id).await? {
        Some(entity) => entity.try_into()?,
        None => return Err(transition_error(&repo, booking_id, "completed").await),
    };
    Ok(Json(booking.into()))
}

/// POST /api/v1/bookings/:booking_id/cancel
///
/// Cancelling an accepted or confirmed booking reverses its commission.
/// Paid commissions are never reversed here; those refunds go through
/// support.
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(request): Json<CancelBookingRequest>,
) -> Result<Json<BookingResponse>, ApiError> {
    request.validate()?;

    let bookings = BookingRepository::new(state.pool.clone());
    let booking: Booking = match bookings.cancel(booking_id, request.reason.as_deref()).await? {
        Some(entity) => entity.try_into()?,
        None => return Err(transition_error(&bookings, booking_id, "cancelled").await),
    };

    let commissions = CommissionRepository::new(state.pool.clone());
    match commissions.reverse_for_booking(booking.booking_id).await {
        Ok(Some(_)) => {
            tracing::info!(booking_id = %booking.booking_id, "Commission reversed");
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(
                booking_id = %booking.booking_id,
                error = %e,
                "Failed to reverse commission on cancellation"
            );
        }
    }

    state.notifier.dispatch(
        "booking.cancelled",
        json!({
            "bookingId": booking.booking_id,
            "therapistId": booking.therapist_id,
        }),
    );

    Ok(Json(booking.into()))
}

/// Distinguishes "no such booking" from "booking exists but the transition
/// is not allowed from its current status".
async fn transition_error(
    repo: &BookingRepository,
    booking_id: Uuid,
    target: &str,
) -> ApiError {
    match repo.find_by_booking_id(booking_id).await {
        Ok(Some(entity)) => ApiError::Conflict(format!(
            "Booking cannot be {} from status {}",
            target, entity.status
        )),
        Ok(None) => ApiError::NotFound("Booking not found".to_string()),
        Err(e) => e.into(),
    }
}
