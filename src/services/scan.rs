// Scan pipeline orchestration.
// Order per request: normalize -> cache read -> allowlist -> signals ->
// classify -> persist -> cache write. Terminal on the first cache hit,
// allowlist hit, or unrecoverable error.

use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::{
    app::AppState,
    models::{NewScanLog, ScanResponse},
    services::{
        cache::ScanCache,
        recorder::ScanRecorder,
        signals::{fold_signals, MlClient, SafeBrowsingClient, SignalAggregator},
        verdict::{classify, VerdictConfig},
    },
    utils::{allowlist::Allowlist, normalize_url, ScanError},
};

pub struct ScanService {
    cache: ScanCache,
    allowlist: Arc<Allowlist>,
    signals: SignalAggregator,
    recorder: ScanRecorder,
    verdict_config: VerdictConfig,
}

impl ScanService {
    /// Create a new ScanService instance
    pub fn new(state: &AppState) -> Self {
        Self {
            cache: state.scan_cache.clone(),
            allowlist: state.allowlist.clone(),
            signals: SignalAggregator::new(
                MlClient::new(state.config.ml_service_url.clone()),
                SafeBrowsingClient::new(state.config.safe_browsing_api_key.clone()),
            ),
            recorder: ScanRecorder::new(state.diesel_pool.clone()),
            verdict_config: VerdictConfig::default(),
        }
    }

    /// Run the full scan pipeline for one submitted URL
    #[instrument(skip(self))]
    pub async fn scan(&self, input: &str) -> Result<ScanResponse, ScanError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ScanError::Validation("url is required".to_string()));
        }

        let url = normalize_url(trimmed);

        // Cache read: a hit replays the earlier decision without a record
        if let Some(outcome) = self.cache.get(&url).await {
            info!("Cache hit for {}", url);
            return Ok(ScanResponse::cached_hit(outcome));
        }

        // Allowlist short-circuit: trusted hosts skip both oracles
        if self.allowlist.is_allowlisted(&url) {
            let record = NewScanLog::allowlisted(url.clone());
            let outcome = record.outcome();

            self.persist_best_effort(record).await;
            self.cache.put(&url, &outcome).await;

            return Ok(ScanResponse::whitelisted(outcome));
        }

        // Concurrent signal collection; ML failure aborts, intel degrades
        let (ml, intel) = self.signals.collect(&url).await;
        let (ml_score, intel_signal) = fold_signals(ml, intel)?;

        let (final_score, verdict) = classify(&self.verdict_config, ml_score, intel_signal.flagged);

        let record = NewScanLog::computed(
            url.clone(),
            ml_score,
            intel_signal.flagged,
            intel_signal.provider,
            final_score,
            verdict,
        );
        let outcome = record.outcome();

        self.persist_best_effort(record).await;

        // Cache write is best-effort and never blocks the response
        self.cache.put(&url, &outcome).await;

        Ok(ScanResponse::fresh(outcome))
    }

    /// Persist the audit record. The verdict is already computed, so a
    /// failed insert is logged as a reliability signal instead of
    /// suppressing a correct classification; the write is not retried.
    async fn persist_best_effort(&self, record: NewScanLog) {
        let url = record.url.clone();
        match self.recorder.record(record).await {
            Ok(log) => {
                info!("Recorded scan {} for {} ({})", log.id, log.url, log.verdict);
            },
            Err(e) => {
                error!("Failed to persist scan record for {}: {}", url, e);
            },
        }
    }
}
