//! Global request rate limiting.

use std::num::NonZeroU32;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use governor::{Quota, RateLimiter};

use crate::{config::RateLimitSettings, error::ApiError, AppState};

/// Process-wide limiter shared by every route.
pub type GlobalRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Build the limiter: `requests` burst, replenished evenly over `period`.
///
/// Returns `None` when disabled or when either value is zero.
pub fn build_rate_limiter(settings: Option<RateLimitSettings>) -> Option<Arc<GlobalRateLimiter>> {
    let settings = settings?;
    let burst = NonZeroU32::new(settings.requests)?;
    let quota = Quota::with_period(settings.period / settings.requests)?.allow_burst(burst);
    Some(Arc::new(RateLimiter::direct(quota)))
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(limiter) = &state.rate_limiter {
        if limiter.check().is_err() {
            tracing::warn!(path = %request.uri().path(), "Rate limit exceeded");
            return Err(ApiError::TooManyRequests);
        }
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_disabled_settings_build_nothing() {
        assert!(build_rate_limiter(None).is_none());
        assert!(build_rate_limiter(Some(RateLimitSettings {
            requests: 0,
            period: Duration::from_secs(60),
        }))
        .is_none());
    }

    #[test]
    fn test_burst_is_exhausted() {
        let limiter = build_rate_limiter(Some(RateLimitSettings {
            requests: 3,
            period: Duration::from_secs(3600),
        }))
        .unwrap();
        for _ in 0..3 {
            assert!(limiter.check().is_ok());
        }
        assert!(limiter.check().is_err());
    }
}
