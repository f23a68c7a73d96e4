use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_admin, require_auth,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{
    admin, bookings, commissions, discount_codes, emergency_alerts, health, locations, payments,
    support_tickets, therapists,
};
use crate::services::notification::{NotificationError, NotificationService};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
    pub notifier: NotificationService,
}

pub fn create_app(config: Config, pool: PgPool) -> Result<Router, NotificationError> {
    let config = Arc::new(config);

    // One shared HTTP client for all outbound notifications
    let notifier = NotificationService::new(config.notifications.clone())?;

    // Rate limiting is disabled entirely when the limit is 0
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let state = AppState {
        pool,
        config: config.clone(),
        rate_limiter,
        notifier,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Protected routes (require API key authentication)
    // Middleware order: auth runs first, then rate limiting (which needs the auth info)
    let protected_routes = Router::new()
        // Provider routes (v1)
        .route("/api/v1/therapists", post(therapists::register_therapist))
        .route("/api/v1/therapists", get(therapists::list_therapists))
        .route(
            "/api/v1/therapists/:therapist_id",
            get(therapists::get_therapist),
        )
        .route(
            "/api/v1/therapists/:therapist_id",
            put(therapists::update_therapist),
        )
        .route(
            "/api/v1/therapists/:therapist_id/availability",
            put(therapists::update_availability),
        )
        // Booking routes (v1)
        .route("/api/v1/bookings", post(bookings::create_booking))
        .route("/api/v1/bookings", get(bookings::list_bookings))
        .route("/api/v1/bookings/:booking_id", get(bookings::get_booking))
        .route(
            "/api/v1/bookings/:booking_id/accept",
            post(bookings::accept_booking),
        )
        .route(
            "/api/v1/bookings/:booking_id/confirm",
            post(bookings::confirm_booking),
        )
        .route(
            "/api/v1/bookings/:booking_id/complete",
            post(bookings::complete_booking),
        )
        .route(
            "/api/v1/bookings/:booking_id/cancel",
            post(bookings::cancel_booking),
        )
        // Discount code routes (v1)
        .route(
            "/api/v1/discount-codes",
            post(discount_codes::generate_code),
        )
        .route(
            "/api/v1/discount-codes/validate",
            post(discount_codes::validate_code),
        )
        .route(
            "/api/v1/therapists/:therapist_id/discount-codes",
            get(discount_codes::list_codes),
        )
        .route(
            "/api/v1/therapists/:therapist_id/discount-codes/stats",
            get(discount_codes::code_stats),
        )
        // Commission routes (v1)
        .route(
            "/api/v1/commissions/:commission_id",
            get(commissions::get_commission),
        )
        .route(
            "/api/v1/therapists/:therapist_id/commissions",
            get(commissions::list_commissions),
        )
        .route(
            "/api/v1/therapists/:therapist_id/commissions/unpaid",
            get(commissions::unpaid_summary),
        )
        .route(
            "/api/v1/commissions/:commission_id/proof",
            post(commissions::submit_proof),
        )
        // Payment routes (v1)
        .route("/api/v1/payments", post(payments::record_payment))
        .route("/api/v1/payments", get(payments::list_payments))
        .route(
            "/api/v1/payments/:transaction_id",
            get(payments::get_payment),
        )
        // Emergency alert routes (v1)
        .route(
            "/api/v1/emergency-alerts",
            post(emergency_alerts::trigger_alert),
        )
        // Support ticket routes (v1)
        .route(
            "/api/v1/support-tickets",
            post(support_tickets::create_ticket),
        )
        .route(
            "/api/v1/support-tickets",
            get(support_tickets::list_tickets),
        )
        .route(
            "/api/v1/support-tickets/:ticket_id",
            get(support_tickets::get_ticket),
        )
        // Location routes (v1)
        .route("/api/v1/locations", get(locations::list_locations))
        // Rate limiting runs after auth (needs API key ID from auth)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        // Auth runs first (outermost layer = runs first)
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Admin routes (require admin API key)
    let admin_routes = Router::new()
        .route("/api/v1/admin/stats", get(admin::platform_stats))
        .route(
            "/api/v1/admin/commissions/awaiting-verification",
            get(admin::list_awaiting_verification),
        )
        .route(
            "/api/v1/admin/commissions/:commission_id/verify",
            post(admin::verify_commission),
        )
        .route(
            "/api/v1/admin/payments/:transaction_id/review",
            post(admin::review_payment),
        )
        .route(
            "/api/v1/admin/therapists/:therapist_id/reactivate",
            post(admin::reactivate_therapist),
        )
        .route(
            "/api/v1/admin/emergency-alerts",
            get(admin::list_pending_alerts),
        )
        .route(
            "/api/v1/admin/emergency-alerts/:alert_id/acknowledge",
            post(admin::acknowledge_alert),
        )
        .route(
            "/api/v1/admin/support-tickets/:ticket_id",
            put(admin::update_ticket),
        )
        .route("/api/v1/admin/reconciliation", post(admin::run_reconciliation))
        .route("/api/v1/admin/cities", post(admin::create_city))
        .route(
            "/api/v1/admin/cities/:city_id/active",
            put(admin::set_city_active),
        )
        // Rate limiting for admin routes
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        // Admin auth runs first
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    let router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state);

    Ok(router)
}
