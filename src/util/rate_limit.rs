//! Rate limiting utilities

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Rate limiter type alias
pub type Limiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Create a rate limiter with the specified requests per second
pub fn create_limiter(requests_per_second: u32) -> Arc<Limiter> {
    let quota = Quota::per_second(NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN));
    Arc::new(RateLimiter::direct(quota))
}

/// Max control messages per second from one WebSocket client
pub const CONTROL_RATE_LIMIT: u32 = 5;

/// Per-connection rate limiter state
#[derive(Clone)]
pub struct ClientRateLimiter {
    control_limiter: Arc<Limiter>,
}

impl ClientRateLimiter {
    pub fn new() -> Self {
        Self::with_rate(CONTROL_RATE_LIMIT)
    }

    pub fn with_rate(requests_per_second: u32) -> Self {
        Self {
            control_limiter: create_limiter(requests_per_second),
        }
    }

    /// Check if a control message is allowed (returns true if allowed)
    pub fn check_control(&self) -> bool {
        self.control_limiter.check().is_ok()
    }
}

impl Default for ClientRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_beyond_quota_is_rejected() {
        let limiter = ClientRateLimiter::with_rate(2);
        assert!(limiter.check_control());
        assert!(limiter.check_control());
        assert!(!limiter.check_control());
    }
}
