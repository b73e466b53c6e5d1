// Scan record model and request/response DTOs.
// scan_logs is append-only: rows are inserted once and only ever read
// back for the reporting endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Date};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::schema::scan_logs;

// =============================================================================
// CLOSED ENUMS
// =============================================================================

/// Final categorical classification of a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Legit,
    Suspicious,
    Phishing,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Legit => "legit",
            Verdict::Suspicious => "suspicious",
            Verdict::Phishing => "phishing",
        }
    }
}

impl std::str::FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legit" => Ok(Verdict::Legit),
            "suspicious" => Ok(Verdict::Suspicious),
            "phishing" => Ok(Verdict::Phishing),
            other => Err(format!("unknown verdict: {}", other)),
        }
    }
}

/// Which threat-intelligence source produced the intel flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntelProvider {
    Whitelist,
    SafeBrowsing,
    None,
}

impl IntelProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntelProvider::Whitelist => "whitelist",
            IntelProvider::SafeBrowsing => "safe_browsing",
            IntelProvider::None => "none",
        }
    }
}

impl std::str::FromStr for IntelProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "whitelist" => Ok(IntelProvider::Whitelist),
            "safe_browsing" => Ok(IntelProvider::SafeBrowsing),
            "none" => Ok(IntelProvider::None),
            other => Err(format!("unknown intel provider: {}", other)),
        }
    }
}

// =============================================================================
// DATABASE MODELS
// =============================================================================

/// One immutable scan decision as stored in Postgres
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = scan_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ScanLog {
    pub id: Uuid,
    pub url: String,
    pub ml_score: f64,
    pub intel_flag: i16,
    pub intel_provider: String,
    pub final_score: f64,
    pub verdict: String,
    pub created_at: DateTime<Utc>,
}

impl ScanLog {
    /// Externally visible subset of the record
    pub fn outcome(&self) -> ScanOutcome {
        ScanOutcome {
            url: self.url.clone(),
            ml_score: self.ml_score,
            intel_flag: self.intel_flag,
            provider: self.intel_provider.parse().unwrap_or(IntelProvider::None),
            final_score: self.final_score,
            verdict: self.verdict.parse().unwrap_or(Verdict::Legit),
        }
    }
}

/// New scan record for insertion
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = scan_logs)]
pub struct NewScanLog {
    pub id: Uuid,
    pub url: String,
    pub ml_score: f64,
    pub intel_flag: i16,
    pub intel_provider: String,
    pub final_score: f64,
    pub verdict: String,
    pub created_at: DateTime<Utc>,
}

impl NewScanLog {
    /// Zero-signal record for an allowlisted URL
    pub fn allowlisted(url: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            url,
            ml_score: 0.0,
            intel_flag: 0,
            intel_provider: IntelProvider::Whitelist.as_str().to_string(),
            final_score: 0.0,
            verdict: Verdict::Legit.as_str().to_string(),
            created_at: Utc::now(),
        }
    }

    /// Record for a fully scored URL
    pub fn computed(
        url: String,
        ml_score: f64,
        intel_flag: bool,
        provider: IntelProvider,
        final_score: f64,
        verdict: Verdict,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            url,
            ml_score,
            intel_flag: if intel_flag { 1 } else { 0 },
            intel_provider: provider.as_str().to_string(),
            final_score,
            verdict: verdict.as_str().to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn outcome(&self) -> ScanOutcome {
        ScanOutcome {
            url: self.url.clone(),
            ml_score: self.ml_score,
            intel_flag: self.intel_flag,
            provider: self.intel_provider.parse().unwrap_or(IntelProvider::None),
            final_score: self.final_score,
            verdict: self.verdict.parse().unwrap_or(Verdict::Legit),
        }
    }
}

// =============================================================================
// REQUEST/RESPONSE DTOs
// =============================================================================

/// Inbound scan request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ScanRequest {
    #[validate(length(min = 1, max = 2048, message = "url is required"))]
    pub url: String,
}

/// Externally visible scan payload. This exact shape is what gets cached,
/// so a cache hit replays the same fields as a fresh computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutcome {
    pub url: String,
    pub ml_score: f64,
    pub intel_flag: i16,
    pub provider: IntelProvider,
    pub final_score: f64,
    pub verdict: Verdict,
}

/// Scan response: outcome plus delivery annotations
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    #[serde(flatten)]
    pub outcome: ScanOutcome,
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whitelisted: Option<bool>,
}

impl ScanResponse {
    pub fn cached_hit(outcome: ScanOutcome) -> Self {
        Self {
            outcome,
            cached: true,
            whitelisted: None,
        }
    }

    pub fn fresh(outcome: ScanOutcome) -> Self {
        Self {
            outcome,
            cached: false,
            whitelisted: None,
        }
    }

    pub fn whitelisted(outcome: ScanOutcome) -> Self {
        Self {
            outcome,
            cached: false,
            whitelisted: Some(true),
        }
    }
}

// =============================================================================
// REPORTING DTOs
// =============================================================================

/// One day of scan volume for the dashboard trend chart
#[derive(Debug, Clone, Serialize, QueryableByName)]
#[serde(rename_all = "camelCase")]
pub struct DailyTrend {
    #[diesel(sql_type = Date)]
    pub day: NaiveDate,
    #[diesel(sql_type = BigInt)]
    pub count: i64,
    #[diesel(sql_type = BigInt)]
    pub phishing_count: i64,
}

/// Aggregate statistics for the reporting surface
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total: i64,
    pub phishing: i64,
    pub legit: i64,
    pub phishing_rate: f64,
    pub daily_trend: Vec<DailyTrend>,
}

/// Recent scan entry for the dashboard feed
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentScan {
    pub id: Uuid,
    pub url: String,
    pub ml_score: f64,
    pub intel_flag: i16,
    pub provider: String,
    pub final_score: f64,
    pub verdict: String,
    pub created_at: DateTime<Utc>,
}

impl From<ScanLog> for RecentScan {
    fn from(log: ScanLog) -> Self {
        Self {
            id: log.id,
            url: log.url,
            ml_score: log.ml_score,
            intel_flag: log.intel_flag,
            provider: log.intel_provider,
            final_score: log.final_score,
            verdict: log.verdict,
            created_at: log.created_at,
        }
    }
}
