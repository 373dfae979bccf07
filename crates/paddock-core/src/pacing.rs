use std::num::NonZeroU32;
use std::sync::Arc;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

use crate::config::FetchConfig;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Token-bucket pacing for upstream calls.
///
/// Shared by every fetch issued through one fetcher, so a concurrent fan-out
/// cannot exceed the configured request rate.
#[derive(Clone, Default)]
pub struct RequestPacer {
    limiter: Option<Arc<DirectRateLimiter>>,
}

impl RequestPacer {
    /// A rate of zero disables pacing.
    pub fn new(requests_per_second: u32, burst: u32) -> Self {
        let Some(rate) = NonZeroU32::new(requests_per_second) else {
            return Self::unlimited();
        };
        let burst = NonZeroU32::new(burst).unwrap_or(rate);

        Self {
            limiter: Some(Arc::new(RateLimiter::direct(
                Quota::per_second(rate).allow_burst(burst),
            ))),
        }
    }

    pub fn unlimited() -> Self {
        Self { limiter: None }
    }

    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(config.requests_per_second, config.burst)
    }

    /// Take a token for one request, waiting when the budget is exhausted.
    /// Returns `true` when the call had to wait.
    pub async fn acquire(&self) -> bool {
        if self.try_acquire() {
            return false;
        }
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
        true
    }

    /// Take a token without waiting; `false` when the budget is exhausted.
    fn try_acquire(&self) -> bool {
        self.limiter
            .as_ref()
            .map_or(true, |limiter| limiter.check().is_ok())
    }

    pub fn is_unlimited(&self) -> bool {
        self.limiter.is_none()
    }
}

impl std::fmt::Debug for RequestPacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPacer")
            .field("unlimited", &self.is_unlimited())
            .finish()
    }
}
