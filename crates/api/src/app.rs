use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use domain::services::DecisionPolicy;
use shared::jwt::{JwtConfig, JwtError};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_user_auth,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{
    approvals, auth, dashboard, health, notifications, profile, reports, reservations, resources,
    spaces,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

impl AppState {
    /// Fails when the configured JWT key pair cannot be parsed.
    pub fn new(config: Config, pool: PgPool) -> Result<Self, JwtError> {
        let jwt = JwtConfig::from_rsa_pem(
            &config.jwt.private_key,
            &config.jwt.public_key,
            config.jwt.access_token_expiry_secs,
            config.jwt.refresh_token_expiry_secs,
            config.jwt.leeway_secs,
        )?;

        let rate_limiter =
            RateLimiterState::new(config.security.rate_limit_per_minute).map(Arc::new);

        Ok(Self {
            pool,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            rate_limiter,
        })
    }

    pub fn decision_policy(&self) -> DecisionPolicy {
        DecisionPolicy::from_allow_redecision(self.config.booking.allow_redecision)
    }
}

pub fn create_app(config: Config, pool: PgPool) -> Result<Router, JwtError> {
    Ok(build_router(AppState::new(config, pool)?))
}

pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    let cors = if config.security.cors_origins.is_empty() {
        // Development: any origin
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
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

    // Bearer token required. Auth runs first, then per-user rate limiting.
    let protected_routes = Router::new()
        .route("/api/v1/me/dashboard", get(dashboard::user_dashboard))
        .route("/api/v1/availability", get(reservations::availability))
        .route("/api/v1/reservations", post(reservations::create_reservation))
        .route(
            "/api/v1/reservations/history",
            get(reservations::list_history),
        )
        .route(
            "/api/v1/reservations/:reservation_id",
            get(reservations::get_reservation).put(reservations::update_reservation),
        )
        .route(
            "/api/v1/reservations/:reservation_id/cancel",
            post(reservations::cancel_reservation),
        )
        .route("/api/v1/spaces", get(spaces::list_spaces))
        .route("/api/v1/spaces/:space_id", get(spaces::get_space))
        .route("/api/v1/resources", get(resources::list_resources))
        .route("/api/v1/resources/:resource_id", get(resources::get_resource))
        .route("/api/v1/notifications", get(notifications::list_notifications))
        .route(
            "/api/v1/notifications/mark-read",
            post(notifications::mark_all_read),
        )
        .route(
            "/api/v1/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        // Staff-only; the StaffAuth extractor answers 403 for everyone else
        .route("/api/v1/admin/dashboard", get(dashboard::staff_dashboard))
        .route("/api/v1/admin/approvals", get(approvals::list_pending))
        .route(
            "/api/v1/admin/reservations/:reservation_id/decision",
            post(approvals::decide),
        )
        .route(
            "/api/v1/admin/reservations/:reservation_id/approval",
            get(approvals::get_approval),
        )
        .route("/api/v1/admin/spaces", post(spaces::create_space))
        .route(
            "/api/v1/admin/spaces/:space_id",
            put(spaces::update_space).delete(spaces::delete_space),
        )
        .route("/api/v1/admin/resources", post(resources::create_resource))
        .route(
            "/api/v1/admin/resources/:resource_id",
            put(resources::update_resource).delete(resources::delete_resource),
        )
        .route(
            "/api/v1/admin/reports/reservations.csv",
            get(reports::reservations_report),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/metrics", get(metrics_handler));

    // Layers run bottom-up: CORS first, security headers last.
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
