// Signal collection from the two upstream oracles.
// Both calls are issued concurrently under independent 5-second timeouts
// and modelled as Results; the fold decides what a partial failure means.

use once_cell::sync::Lazy;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{instrument, warn};

use crate::models::IntelProvider;
use crate::utils::ScanError;

/// Per-oracle timeout budget; every call is single-shot, never retried
pub const ORACLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Safe Browsing v4 lookup endpoint
const SAFE_BROWSING_ENDPOINT: &str =
    "https://safebrowsing.googleapis.com/v4/threatMatches:find";

// Shared HTTP client for oracle calls with connection pooling
static ORACLE_HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(30))
        .timeout(ORACLE_TIMEOUT)
        .user_agent("PhishScan/1.0")
        .build()
        .unwrap_or_default()
});

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("oracle not configured")]
    NotConfigured,

    #[error("oracle call timed out after {0:?}")]
    Timeout(Duration),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),
}

// =============================================================================
// ML ORACLE
// =============================================================================

#[derive(Debug, Serialize)]
struct MlScoreRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct MlScoreResponse {
    #[serde(rename = "mlScore")]
    ml_score: f64,
}

/// Client for the external ML scoring service
#[derive(Debug, Clone)]
pub struct MlClient {
    endpoint: Option<String>,
}

impl MlClient {
    pub fn new(endpoint: Option<String>) -> Self {
        Self { endpoint }
    }

    /// Fetch the phishing probability for a URL.
    /// Any failure here is a hard failure for the whole scan.
    pub async fn score(&self, url: &str) -> Result<f64, SignalError> {
        let endpoint = self.endpoint.as_deref().ok_or(SignalError::NotConfigured)?;

        let response = ORACLE_HTTP_CLIENT
            .post(endpoint)
            .json(&MlScoreRequest { url })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SignalError::Status(response.status().as_u16()));
        }

        let body: MlScoreResponse = response
            .json()
            .await
            .map_err(|e| SignalError::Malformed(e.to_string()))?;

        if !(0.0..=1.0).contains(&body.ml_score) || !body.ml_score.is_finite() {
            return Err(SignalError::Malformed(format!(
                "mlScore out of range: {}",
                body.ml_score
            )));
        }

        Ok(body.ml_score)
    }
}

// =============================================================================
// THREAT-INTEL ORACLE (Google Safe Browsing v4)
// =============================================================================

/// Normalized threat-intelligence signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntelSignal {
    pub flagged: bool,
    pub provider: IntelProvider,
}

impl IntelSignal {
    /// Signal used when no provider is configured or intel degraded
    pub fn absent() -> Self {
        Self {
            flagged: false,
            provider: IntelProvider::None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreatInfo<'a> {
    threat_types: [&'static str; 3],
    platform_types: [&'static str; 1],
    threat_entry_types: [&'static str; 1],
    threat_entries: [ThreatEntry<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ThreatEntry<'a> {
    url: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreatMatchRequest<'a> {
    threat_info: ThreatInfo<'a>,
}

#[derive(Debug, Deserialize, Default)]
struct ThreatMatchResponse {
    #[serde(default)]
    matches: Vec<serde_json::Value>,
}

/// Client for the Google Safe Browsing lookup API
#[derive(Debug, Clone)]
pub struct SafeBrowsingClient {
    api_key: Option<String>,
    endpoint: String,
}

impl SafeBrowsingClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            endpoint: SAFE_BROWSING_ENDPOINT.to_string(),
        }
    }

    /// Override the lookup endpoint (stub servers in tests)
    pub fn with_endpoint(api_key: Option<String>, endpoint: String) -> Self {
        Self { api_key, endpoint }
    }

    /// Check a URL against the Safe Browsing database.
    /// With no API key configured this short-circuits to an absent signal
    /// without touching the network - a configuration state, not a failure.
    pub async fn check(&self, url: &str) -> Result<IntelSignal, SignalError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(IntelSignal::absent());
        };

        let body = ThreatMatchRequest {
            threat_info: ThreatInfo {
                threat_types: ["MALWARE", "SOCIAL_ENGINEERING", "UNWANTED_SOFTWARE"],
                platform_types: ["ANY_PLATFORM"],
                threat_entry_types: ["URL"],
                threat_entries: [ThreatEntry { url }],
            },
        };

        let response = ORACLE_HTTP_CLIENT
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SignalError::Status(response.status().as_u16()));
        }

        let parsed: ThreatMatchResponse = response
            .json()
            .await
            .map_err(|e| SignalError::Malformed(e.to_string()))?;

        Ok(IntelSignal {
            flagged: !parsed.matches.is_empty(),
            provider: IntelProvider::SafeBrowsing,
        })
    }
}

// =============================================================================
// AGGREGATOR
// =============================================================================

/// Fan-out/fan-in over the two oracles
#[derive(Debug, Clone)]
pub struct SignalAggregator {
    ml: MlClient,
    safe_browsing: SafeBrowsingClient,
}

impl SignalAggregator {
    pub fn new(ml: MlClient, safe_browsing: SafeBrowsingClient) -> Self {
        Self { ml, safe_browsing }
    }

    /// Issue both oracle calls concurrently, each under its own timeout.
    /// Total added latency is bounded by the slower oracle, not the sum.
    #[instrument(skip(self))]
    pub async fn collect(
        &self,
        url: &str,
    ) -> (Result<f64, SignalError>, Result<IntelSignal, SignalError>) {
        let ml_call = tokio::time::timeout(ORACLE_TIMEOUT, self.ml.score(url));
        let intel_call = tokio::time::timeout(ORACLE_TIMEOUT, self.safe_browsing.check(url));

        let (ml, intel) = tokio::join!(ml_call, intel_call);

        let ml = match ml {
            Ok(inner) => inner,
            Err(_) => Err(SignalError::Timeout(ORACLE_TIMEOUT)),
        };
        let intel = match intel {
            Ok(inner) => inner,
            Err(_) => Err(SignalError::Timeout(ORACLE_TIMEOUT)),
        };

        (ml, intel)
    }
}

/// Fold the two oracle results into the inputs for classification.
/// ML failure aborts the scan; intel failure degrades to an absent signal
/// since the ML probability alone still supports a meaningful verdict.
pub fn fold_signals(
    ml: Result<f64, SignalError>,
    intel: Result<IntelSignal, SignalError>,
) -> Result<(f64, IntelSignal), ScanError> {
    let ml_score = ml.map_err(|e| ScanError::Upstream(format!("ML oracle failed: {}", e)))?;

    let intel_signal = match intel {
        Ok(signal) => signal,
        Err(e) => {
            warn!("Threat-intel oracle failed, continuing without intel: {}", e);
            IntelSignal::absent()
        },
    };

    Ok((ml_score, intel_signal))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_safe_browsing_skipped_without_api_key() {
        let client = SafeBrowsingClient::new(None);
        let signal = client.check("http://example.com").await.unwrap();
        assert_eq!(signal, IntelSignal::absent());
    }

    #[tokio::test]
    async fn test_ml_client_requires_endpoint() {
        let client = MlClient::new(None);
        let result = client.score("http://example.com").await;
        assert!(matches!(result, Err(SignalError::NotConfigured)));
    }

    #[test]
    fn test_fold_ml_failure_is_terminal() {
        let folded = fold_signals(
            Err(SignalError::Timeout(ORACLE_TIMEOUT)),
            Ok(IntelSignal {
                flagged: true,
                provider: IntelProvider::SafeBrowsing,
            }),
        );
        assert!(matches!(folded, Err(ScanError::Upstream(_))));
    }

    #[test]
    fn test_fold_intel_failure_degrades() {
        let folded = fold_signals(Ok(0.4), Err(SignalError::Status(500))).unwrap();
        assert_eq!(folded.0, 0.4);
        assert_eq!(folded.1, IntelSignal::absent());
    }

    #[test]
    fn test_fold_both_ok() {
        let signal = IntelSignal {
            flagged: true,
            provider: IntelProvider::SafeBrowsing,
        };
        let folded = fold_signals(Ok(0.9), Ok(signal)).unwrap();
        assert_eq!(folded, (0.9, signal));
    }

    #[test]
    fn test_ml_response_parsing() {
        let body: MlScoreResponse = serde_json::from_str(r#"{"mlScore": 0.87}"#).unwrap();
        assert_eq!(body.ml_score, 0.87);
    }

    #[test]
    fn test_threat_match_request_shape() {
        let body = ThreatMatchRequest {
            threat_info: ThreatInfo {
                threat_types: ["MALWARE", "SOCIAL_ENGINEERING", "UNWANTED_SOFTWARE"],
                platform_types: ["ANY_PLATFORM"],
                threat_entry_types: ["URL"],
                threat_entries: [ThreatEntry {
                    url: "http://example.com",
                }],
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["threatInfo"]["threatTypes"][1], "SOCIAL_ENGINEERING");
        assert_eq!(json["threatInfo"]["platformTypes"][0], "ANY_PLATFORM");
        assert_eq!(
            json["threatInfo"]["threatEntries"][0]["url"],
            "http://example.com"
        );
    }

    #[test]
    fn test_threat_match_response_defaults_to_no_matches() {
        let parsed: ThreatMatchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.matches.is_empty());

        let parsed: ThreatMatchResponse =
            serde_json::from_str(r#"{"matches": [{"threatType": "MALWARE"}]}"#).unwrap();
        assert_eq!(parsed.matches.len(), 1);
    }
}
