// Cache-aside layer over scan outcomes.
// The cache is strictly an accelerator: a disabled or failing backend
// behaves like a permanent miss and never changes a classification.

use tracing::warn;

use crate::db::RedisPool;
use crate::models::ScanOutcome;

/// Fixed TTL for scan payloads (1 hour); entries expire passively,
/// there is no invalidation path.
pub const SCAN_CACHE_TTL_SECONDS: u64 = 3600;

/// Namespaced cache key for a normalized URL
pub fn scan_cache_key(url: &str) -> String {
    format!("scan:{}", url)
}

#[derive(Clone)]
pub struct ScanCache {
    redis: Option<RedisPool>,
    ttl_seconds: u64,
}

impl ScanCache {
    pub fn new(redis: Option<RedisPool>, ttl_seconds: u64) -> Self {
        Self { redis, ttl_seconds }
    }

    /// Disabled cache: every get is a miss, every put is a no-op
    pub fn disabled() -> Self {
        Self {
            redis: None,
            ttl_seconds: SCAN_CACHE_TTL_SECONDS,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.redis.is_some()
    }

    /// Look up a cached scan outcome. Backend errors and undecodable
    /// payloads both degrade to a miss.
    pub async fn get(&self, url: &str) -> Option<ScanOutcome> {
        let redis = self.redis.as_ref()?;
        let key = scan_cache_key(url);

        match redis.get_string(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<ScanOutcome>(&raw) {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    warn!("Failed to deserialize cached scan for {}: {}", url, e);
                    None
                },
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Redis error reading scan cache: {}", e);
                None
            },
        }
    }

    /// Store a scan outcome with the configured TTL, best-effort
    pub async fn put(&self, url: &str, outcome: &ScanOutcome) {
        let Some(redis) = self.redis.as_ref() else {
            return;
        };
        let key = scan_cache_key(url);

        let serialized = match serde_json::to_string(outcome) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to serialize scan outcome for {}: {}", url, e);
                return;
            },
        };

        if let Err(e) = redis.set_with_expiry(&key, serialized, self.ttl_seconds).await {
            warn!("Redis error writing scan cache: {}", e);
        }
    }
}
