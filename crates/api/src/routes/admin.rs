//! Admin endpoint handlers.
//!
//! Everything here requires an admin API key. The acting key's prefix is
//! recorded as the audit identity on verifications and acknowledgements.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain::models::booking::Booking;
use domain::models::commission::{
    CommissionRecord, CommissionResponse, ListCommissionsResponse, PAYMENT_DEADLINE_HOURS,
    VerifyPaymentRequest,
};
use domain::models::emergency_alert::{AlertResponse, EmergencyAlert, ListAlertsResponse};
use domain::models::location::{City, CityResponse, CreateCityRequest};
use domain::models::payment::{PaymentResponse, PaymentTransaction, ReviewPaymentRequest};
use domain::models::support_ticket::{SupportTicket, TicketResponse, UpdateTicketRequest};
use domain::models::therapist::{Therapist, TherapistResponse};
use domain::services::pricing;
use domain::services::reconciliation::{
    bookings_needing_commissions, reconcile, ReconciliationReport, RECONCILIATION_SCAN_LIMIT,
};
use persistence::repositories::{
    BookingRepository, CommissionInput, CommissionRepository, EmergencyAlertRepository,
    LocationRepository, PaymentRepository, StatsRepository, SupportTicketRepository,
    TherapistRepository,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::api_key::ApiKeyAuth;
use crate::middleware::metrics;

/// GET /api/v1/admin/commissions/awaiting-verification
pub async fn list_awaiting_verification(
    State(state): State<AppState>,
) -> Result<Json<ListCommissionsResponse>, ApiError> {
    let repo = CommissionRepository::new(state.pool.clone());
    let entities = repo
        .list_awaiting_verification(state.config.limits.max_list_limit)
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

/// POST /api/v1/admin/commissions/:commission_id/verify
pub async fn verify_commission(
    State(state): State<AppState>,
    auth: ApiKeyAuth,
    Path(commission_id): Path<Uuid>,
    Json(request): Json<VerifyPaymentRequest>,
) -> Result<Json<CommissionResponse>, ApiError> {
    request.validate()?;

    let repo = CommissionRepository::new(state.pool.clone());
    let updated = if request.approved {
        repo.approve(commission_id, &auth.key_prefix).await?
    } else {
        repo.reject(
            commission_id,
            &auth.key_prefix,
            request.rejection_reason.as_deref(),
        )
        .await?
    };

    let record: CommissionRecord = match updated {
        Some(entity) => entity.try_into()?,
        None => {
            return match repo.find_by_commission_id(commission_id).await? {
                Some(entity) => Err(ApiError::Conflict(format!(
                    "Commission is {} and cannot be verified",
                    entity.status
                ))),
                None => Err(ApiError::NotFound("Commission record not found".to_string())),
            };
        }
    };

    // Settling the balance lifts an overdue deactivation. No-op when the
    // provider was never deactivated.
    if request.approved {
        let therapists = TherapistRepository::new(state.pool.clone());
        match therapists.reactivate(record.therapist_id).await {
            Ok(Some(_)) => {
                tracing::info!(
                    therapist_id = %record.therapist_id,
                    "Provider reactivated after commission payment"
                );
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(
                    therapist_id = %record.therapist_id,
                    error = %e,
                    "Failed to reactivate provider after commission payment"
                );
            }
        }
    }

    tracing::info!(
        commission_id = %record.commission_id,
        approved = request.approved,
        verified_by = %auth.key_prefix,
        "Commission payment reviewed"
    );

    Ok(Json(record.into()))
}

/// POST /api/v1/admin/payments/:transaction_id/review
pub async fn review_payment(
    State(state): State<AppState>,
    auth: ApiKeyAuth,
    Path(transaction_id): Path<Uuid>,
    Json(request): Json<ReviewPaymentRequest>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let repo = PaymentRepository::new(state.pool.clone());
    let updated = repo
        .review(transaction_id, request.approved, &auth.key_prefix)
        .await?;

    let payment: PaymentTransaction = match updated {
        Some(entity) => entity.try_into()?,
        None => {
            return match repo.find_by_transaction_id(transaction_id).await? {
                Some(_) => Err(ApiError::Conflict(
                    "Payment has already been settled".to_string(),
                )),
                None => Err(ApiError::NotFound("Payment not found".to_string())),
            };
        }
    };

    Ok(Json(payment.into()))
}

/// POST /api/v1/admin/therapists/:therapist_id/reactivate
pub async fn reactivate_therapist(
    State(state): State<AppState>,
    Path(therapist_id): Path<Uuid>,
) -> Result<Json<TherapistResponse>, ApiError> {
    let repo = TherapistRepository::new(state.pool.clone());
    let reactivated = repo.reactivate(therapist_id).await?;

    let therapist: Therapist = match reactivated {
        Some(entity) => entity.try_into()?,
        None => {
            return match repo.find_by_therapist_id(therapist_id).await? {
                Some(_) => Err(ApiError::Conflict(
                    "Provider is not deactivated".to_string(),
                )),
                None => Err(ApiError::NotFound("Provider not found".to_string())),
            };
        }
    };

    tracing::info!(therapist_id = %therapist.therapist_id, "Provider reactivated");
    Ok(Json(therapist.into()))
}

/// GET /api/v1/admin/emergency-alerts
pub async fn list_pending_alerts(
    State(state): State<AppState>,
) -> Result<Json<ListAlertsResponse>, ApiError> {
    let repo = EmergencyAlertRepository::new(state.pool.clone());
    let entities = repo.list_pending(state.config.limits.max_list_limit).await?;

    let mut alerts = Vec::with_capacity(entities.len());
    for entity in entities {
        let alert: EmergencyAlert = entity.try_into()?;
        alerts.push(alert.into());
    }

    Ok(Json(ListAlertsResponse {
        total: alerts.len(),
        alerts,
    }))
}

/// POST /api/v1/admin/emergency-alerts/:alert_id/acknowledge
pub async fn acknowledge_alert(
    State(state): State<AppState>,
    auth: ApiKeyAuth,
    Path(alert_id): Path<Uuid>,
) -> Result<Json<AlertResponse>, ApiError> {
    let repo = EmergencyAlertRepository::new(state.pool.clone());
    let acknowledged = repo.acknowledge(alert_id, &auth.key_prefix).await?;

    let alert: EmergencyAlert = match acknowledged {
        Some(entity) => entity.try_into()?,
        None => {
            return match repo.find_by_alert_id(alert_id).await? {
                Some(_) => Err(ApiError::Conflict(
                    "Alert has already been acknowledged".to_string(),
                )),
                None => Err(ApiError::NotFound("Alert not found".to_string())),
            };
        }
    };

    Ok(Json(alert.into()))
}

/// PUT /api/v1/admin/support-tickets/:ticket_id
pub async fn update_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<Uuid>,
    Json(request): Json<UpdateTicketRequest>,
) -> Result<Json<TicketResponse>, ApiError> {
    request.validate()?;

    let repo = SupportTicketRepository::new(state.pool.clone());
    let current: SupportTicket = repo
        .find_by_ticket_id(ticket_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".to_string()))?
        .try_into()?;

    if !current.status.can_transition_to(request.status) {
        return Err(ApiError::Conflict(format!(
            "Ticket cannot move from {} to {}",
            current.status.as_str(),
            request.status.as_str()
        )));
    }

    let ticket: SupportTicket = repo
        .update_status(ticket_id, request.status, request.resolution_note.as_deref())
        .await?
        .ok_or_else(|| ApiError::Conflict("Ticket is closed".to_string()))?
        .try_into()?;

    Ok(Json(ticket.into()))
}

/// Platform-wide counters for the admin dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStatsResponse {
    pub therapists_by_status: BTreeMap<String, i64>,
    pub bookings_by_status: BTreeMap<String, i64>,
    pub commissions: CommissionTotalsResponse,
    pub open_tickets: i64,
    pub pending_alerts: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionTotalsResponse {
    pub pending_total: i64,
    pub paid_total: i64,
    pub overdue_total: i64,
}

/// GET /api/v1/admin/stats
pub async fn platform_stats(
    State(state): State<AppState>,
) -> Result<Json<PlatformStatsResponse>, ApiError> {
    let repo = StatsRepository::new(state.pool.clone());

    let (therapists, bookings, totals, open_tickets, pending_alerts) = tokio::try_join!(
        repo.therapists_by_status(),
        repo.bookings_by_status(),
        repo.commission_totals(),
        repo.open_tickets(),
        repo.pending_alerts(),
    )?;

    Ok(Json(PlatformStatsResponse {
        therapists_by_status: therapists.into_iter().map(|c| (c.status, c.count)).collect(),
        bookings_by_status: bookings.into_iter().map(|c| (c.status, c.count)).collect(),
        commissions: CommissionTotalsResponse {
            pending_total: totals.pending_amount,
            paid_total: totals.paid_amount,
            overdue_total: totals.overdue_amount,
        },
        open_tickets,
        pending_alerts,
    }))
}

/// Outcome of a manually triggered reconciliation pass.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationRunResponse {
    pub report: ReconciliationReport,
    /// Missing commission records created during this run.
    pub repaired: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationQuery {
    /// When set, missing commission records are created. Off by default so
    /// a plain POST is a read-only report.
    #[serde(default)]
    pub auto_fix: bool,
}

/// POST /api/v1/admin/reconciliation
///
/// Same pass the hourly job runs, on demand.
pub async fn run_reconciliation(
    State(state): State<AppState>,
    Query(query): Query<ReconciliationQuery>,
) -> Result<Json<ReconciliationRunResponse>, ApiError> {
    let booking_repo = BookingRepository::new(state.pool.clone());
    let commission_repo = CommissionRepository::new(state.pool.clone());

    let booking_entities = booking_repo
        .list_recent_commissionable(RECONCILIATION_SCAN_LIMIT)
        .await?;
    let commission_entities = commission_repo.list_recent(RECONCILIATION_SCAN_LIMIT).await?;

    let mut bookings: Vec<Booking> = Vec::with_capacity(booking_entities.len());
    for entity in booking_entities {
        bookings.push(entity.try_into()?);
    }
    let mut commissions: Vec<CommissionRecord> = Vec::with_capacity(commission_entities.len());
    for entity in commission_entities {
        commissions.push(entity.try_into()?);
    }

    let report = reconcile(&bookings, &commissions);
    metrics::record_reconciliation_findings(report.critical_count());

    let mut repaired = 0;
    let to_repair = if query.auto_fix {
        bookings_needing_commissions(&report, &bookings)
    } else {
        Vec::new()
    };
    for booking in to_repair {
        let created = commission_repo
            .create(CommissionInput {
                booking_id: booking.booking_id,
                therapist_id: booking.therapist_id,
                booking_amount: booking.total_price,
                commission_rate: pricing::COMMISSION_RATE,
                commission_amount: booking.admin_commission,
                payment_deadline: Utc::now() + Duration::hours(PAYMENT_DEADLINE_HOURS),
            })
            .await;
        match created {
            Ok(_) => repaired += 1,
            Err(e) => {
                tracing::error!(
                    booking_id = %booking.booking_id,
                    error = %e,
                    "Failed to backfill commission record"
                );
            }
        }
    }

    if !report.is_clean() {
        tracing::warn!(
            critical = report.critical_count(),
            repaired = repaired,
            "Reconciliation found ledger mismatches"
        );
    }

    Ok(Json(ReconciliationRunResponse { report, repaired }))
}

/// POST /api/v1/admin/cities
pub async fn create_city(
    State(state): State<AppState>,
    Json(request): Json<CreateCityRequest>,
) -> Result<(axum::http::StatusCode, Json<CityResponse>), ApiError> {
    request.validate()?;

    let repo = LocationRepository::new(state.pool.clone());
    let city: City = repo
        .create_city(&request.country_code, &request.name)
        .await?
        .into();

    Ok((axum::http::StatusCode::CREATED, Json(city.into())))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCityActiveRequest {
    pub is_active: bool,
}

/// PUT /api/v1/admin/cities/:city_id/active
pub async fn set_city_active(
    State(state): State<AppState>,
    Path(city_id): Path<i64>,
    Json(request): Json<SetCityActiveRequest>,
) -> Result<Json<CityResponse>, ApiError> {
    let repo = LocationRepository::new(state.pool.clone());
    let city: City = repo
        .set_city_active(city_id, request.is_active)
        .await?
        .ok_or_else(|| ApiError::NotFound("City not found".to_string()))?
        .into();
    Ok(Json(city.into()))
}
