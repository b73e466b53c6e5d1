// Fixed-window per-client rate limiting backed by Redis.
// Without Redis the limiter fails open: throttling is an abuse control,
// not a correctness requirement.

use tracing::warn;

use crate::db::RedisPool;

/// Outcome of a rate-limit check for one client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed { remaining: u32 },
    Limited { retry_after_seconds: u64 },
}

impl RateLimitDecision {
    pub fn is_limited(&self) -> bool {
        matches!(self, RateLimitDecision::Limited { .. })
    }
}

fn rate_limit_key(client_id: &str) -> String {
    format!("ratelimit:{}", client_id)
}

#[derive(Clone)]
pub struct RateLimiter {
    redis: Option<RedisPool>,
    max_requests: u32,
    window_seconds: u64,
}

impl RateLimiter {
    pub fn new(redis: Option<RedisPool>, max_requests: u32, window_seconds: u64) -> Self {
        Self {
            redis,
            max_requests,
            window_seconds,
        }
    }

    /// Limiter with no backend; every check is allowed
    pub fn disabled(max_requests: u32, window_seconds: u64) -> Self {
        Self {
            redis: None,
            max_requests,
            window_seconds,
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Count this request against the client's current window.
    /// The Redis counter increments atomically and expires with the window;
    /// backend errors degrade to allowing the request.
    pub async fn check(&self, client_id: &str) -> RateLimitDecision {
        let Some(redis) = self.redis.as_ref() else {
            return RateLimitDecision::Allowed {
                remaining: self.max_requests,
            };
        };

        let key = rate_limit_key(client_id);

        let count = match redis.incr(&key, self.window_seconds).await {
            Ok(count) => count,
            Err(e) => {
                warn!("Redis error in rate limiter, allowing request: {}", e);
                return RateLimitDecision::Allowed {
                    remaining: self.max_requests,
                };
            },
        };

        if count > self.max_requests as i64 {
            let retry_after_seconds = match redis.ttl(&key).await {
                Ok(ttl) if ttl > 0 => ttl as u64,
                _ => self.window_seconds,
            };
            RateLimitDecision::Limited {
                retry_after_seconds,
            }
        } else {
            RateLimitDecision::Allowed {
                remaining: self.max_requests.saturating_sub(count as u32),
            }
        }
    }
}
