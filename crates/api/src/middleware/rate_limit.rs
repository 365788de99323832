//! Per-user rate limiting.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::{Clock, DefaultClock},
    DefaultKeyedRateLimiter, Quota, RateLimiter,
};
use std::num::NonZeroU32;
use uuid::Uuid;

/// Tracked users above which idle buckets get dropped on the next check.
const PRUNE_THRESHOLD: usize = 10_000;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::auth::AuthenticatedUser;

/// One GCRA bucket per authenticated user.
pub struct RateLimiterState {
    limiter: DefaultKeyedRateLimiter<Uuid>,
    clock: DefaultClock,
    rate_limit_per_minute: u32,
    prune_threshold: usize,
}

impl RateLimiterState {
    /// Returns `None` when `rate_limit_per_minute` is 0, which disables limiting.
    pub fn new(rate_limit_per_minute: u32) -> Option<Self> {
        let per_minute = NonZeroU32::new(rate_limit_per_minute)?;
        Some(Self {
            limiter: RateLimiter::keyed(Quota::per_minute(per_minute)),
            clock: DefaultClock::default(),
            rate_limit_per_minute,
            prune_threshold: PRUNE_THRESHOLD,
        })
    }

    pub fn rate_limit_per_minute(&self) -> u32 {
        self.rate_limit_per_minute
    }

    /// `Err` carries the number of seconds to wait, at least 1.
    pub fn check(&self, user_id: Uuid) -> Result<(), u64> {
        let result = self.limiter.check_key(&user_id).map_err(|not_until| {
            not_until
                .wait_time_from(self.clock.now())
                .as_secs()
                .max(1)
        });
        if self.limiter.len() > self.prune_threshold {
            self.prune();
        }
        result
    }

    /// Forgets users whose bucket has fully refilled.
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        tracing::debug!(tracked_users = self.limiter.len(), "Pruned rate limiter");
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("tracked_users", &self.limiter.len())
            .finish()
    }
}

/// Must run after [`super::auth::require_user_auth`], which puts the
/// caller's identity into the request extensions.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let user_id = req
        .extensions()
        .get::<AuthenticatedUser>()
        .map(|user| user.user_id);
    let (Some(limiter), Some(user_id)) = (state.rate_limiter.as_ref(), user_id) else {
        return next.run(req).await;
    };

    match limiter.check(user_id) {
        Ok(()) => next.run(req).await,
        Err(retry_after) => {
            tracing::warn!(user_id = %user_id, retry_after, "Rate limit exceeded");
            rate_limited_response(retry_after)
        }
    }
}

fn rate_limited_response(retry_after: u64) -> Response {
    let mut response = ApiError::RateLimited.into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    response
}
