// Score fusion and verdict thresholding.
// Pure functions of (ml_score, intel_flag) and a fixed configuration;
// the verdict is never stored independently of the inputs that justify it.

use serde::{Deserialize, Serialize};

use crate::models::Verdict;

/// Weights and thresholds for the verdict engine.
/// Fixed for a process lifetime; a struct rather than literals so
/// alternative tunings can be exercised in tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerdictConfig {
    pub ml_weight: f64,
    pub intel_weight: f64,
    pub phishing_threshold: f64,
    pub suspicious_threshold: f64,
}

impl Default for VerdictConfig {
    fn default() -> Self {
        Self {
            ml_weight: 0.7,
            intel_weight: 0.3,
            phishing_threshold: 0.92,
            suspicious_threshold: 0.75,
        }
    }
}

/// Combine the two signals into a fused score and a categorical verdict.
/// The intel flag dominates: a flagged URL is phishing even at ml_score 0.
/// Threshold bands are inclusive on their lower bound.
pub fn classify(config: &VerdictConfig, ml_score: f64, intel_flag: bool) -> (f64, Verdict) {
    let intel = if intel_flag { 1.0 } else { 0.0 };
    let final_score = config.ml_weight * ml_score + config.intel_weight * intel;

    let verdict = if intel_flag {
        Verdict::Phishing
    } else if ml_score >= config.phishing_threshold {
        Verdict::Phishing
    } else if ml_score >= config.suspicious_threshold {
        Verdict::Suspicious
    } else {
        Verdict::Legit
    };

    (final_score, verdict)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_fusion_formula() {
        let config = VerdictConfig::default();

        let (score, _) = classify(&config, 0.5, false);
        assert!((score - 0.35).abs() < 1e-9);

        let (score, _) = classify(&config, 0.5, true);
        assert!((score - 0.65).abs() < 1e-9);

        let (score, _) = classify(&config, 0.95, false);
        assert!((score - 0.665).abs() < 1e-9);
    }

    #[test]
    fn test_threshold_boundaries() {
        let config = VerdictConfig::default();

        assert_eq!(classify(&config, 0.75, false).1, Verdict::Suspicious);
        assert_eq!(classify(&config, 0.7499, false).1, Verdict::Legit);
        assert_eq!(classify(&config, 0.92, false).1, Verdict::Phishing);
        assert_eq!(classify(&config, 0.9199, false).1, Verdict::Suspicious);
        assert_eq!(classify(&config, 0.0, false).1, Verdict::Legit);
    }

    #[test]
    fn test_intel_flag_dominates() {
        let config = VerdictConfig::default();

        assert_eq!(classify(&config, 0.0, true).1, Verdict::Phishing);
        assert_eq!(classify(&config, 0.5, true).1, Verdict::Phishing);
        assert_eq!(classify(&config, 1.0, true).1, Verdict::Phishing);
    }

    #[test]
    fn test_alternative_tuning() {
        let config = VerdictConfig {
            ml_weight: 0.5,
            intel_weight: 0.5,
            phishing_threshold: 0.8,
            suspicious_threshold: 0.5,
        };

        let (score, verdict) = classify(&config, 0.6, false);
        assert!((score - 0.3).abs() < 1e-9);
        assert_eq!(verdict, Verdict::Suspicious);
        assert_eq!(classify(&config, 0.8, false).1, Verdict::Phishing);
    }
}
