pub mod cache;
pub mod rate_limit;
pub mod recorder;
pub mod scan;
pub mod signals;
pub mod verdict;

pub use cache::{scan_cache_key, ScanCache, SCAN_CACHE_TTL_SECONDS};
pub use rate_limit::{RateLimitDecision, RateLimiter};
pub use recorder::{ScanRecorder, RECENT_SCANS_LIMIT};
pub use scan::ScanService;
pub use signals::{
    fold_signals, IntelSignal, MlClient, SafeBrowsingClient, SignalAggregator, SignalError,
    ORACLE_TIMEOUT,
};
pub use verdict::{classify, VerdictConfig};
