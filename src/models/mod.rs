pub mod scan;

// Re-export common types
pub use scan::{
    DailyTrend, IntelProvider, NewScanLog, RecentScan, ScanLog, ScanOutcome, ScanRequest,
    ScanResponse, StatsResponse, Verdict,
};
