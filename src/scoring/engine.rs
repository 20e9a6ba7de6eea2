use serde::Serialize;

use super::config::ScoringConfig;
use super::similarity::LocalSimilarity;

/// Final scores at or above this are a match.
pub const MATCH_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub local: LocalSimilarity,
    pub local_score: f64,
    pub external_score: f64,
    pub final_score: f64,
    pub is_match: bool,
}

/// Pull an external score into [0, 1]. Non-finite values count as 0.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Combine the local signals and the external score into a verdict.
pub fn calculate_score(
    local: LocalSimilarity,
    external_score: f64,
    config: &ScoringConfig,
) -> ScoreResult {
    let local_score = local.mean();
    let external_score = clamp_score(external_score);

    let local_weight = config.local_weight();
    let external_weight = config.external_weight();
    let total_weight = local_weight + external_weight;

    // Validation rejects a zero weight sum; fall back to the plain mean anyway
    let final_score = if total_weight > 0.0 {
        (local_weight * local_score + external_weight * external_score) / total_weight
    } else {
        (local_score + external_score) / 2.0
    };

    ScoreResult {
        local,
        local_score,
        external_score,
        final_score,
        is_match: final_score >= MATCH_THRESHOLD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(name: f64, email: f64, phone: f64) -> LocalSimilarity {
        LocalSimilarity { name, email, phone }
    }

    fn weights(local_weight: f64, external_weight: f64) -> ScoringConfig {
        ScoringConfig {
            local_weight: Some(local_weight),
            external_weight: Some(external_weight),
        }
    }

    #[test]
    fn test_perfect_scores_match() {
        let result = calculate_score(local(1.0, 1.0, 1.0), 1.0, &ScoringConfig::default());
        assert!((result.local_score - 1.0).abs() < 1e-9);
        assert!((result.final_score - 1.0).abs() < 1e-9);
        assert!(result.is_match);
    }

    #[test]
    fn test_default_weights_are_plain_mean() {
        let result = calculate_score(local(0.9, 0.6, 0.0), 0.2, &ScoringConfig::default());
        // local = 0.5, final = (0.5 + 0.2) / 2
        assert!((result.local_score - 0.5).abs() < 1e-9);
        assert!((result.final_score - 0.35).abs() < 1e-9);
        assert!(!result.is_match);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let result = calculate_score(local(0.0, 0.0, 0.0), 1.0, &ScoringConfig::default());
        assert_eq!(result.final_score, 0.5);
        assert!(result.is_match);
    }

    #[test]
    fn test_missing_customer_driven_by_external() {
        let low = calculate_score(LocalSimilarity::default(), 0.4, &ScoringConfig::default());
        assert!((low.final_score - 0.2).abs() < 1e-9);
        assert!(!low.is_match);
    }

    #[test]
    fn test_custom_weights() {
        let result = calculate_score(local(1.0, 1.0, 1.0), 0.0, &weights(3.0, 1.0));
        assert!((result.final_score - 0.75).abs() < 1e-9);

        let external_only = calculate_score(local(1.0, 1.0, 1.0), 0.3, &weights(0.0, 1.0));
        assert!((external_only.final_score - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_external_score_is_clamped() {
        let high = calculate_score(local(0.0, 0.0, 0.0), 85.0, &ScoringConfig::default());
        assert_eq!(high.external_score, 1.0);

        let negative = calculate_score(local(0.0, 0.0, 0.0), -2.0, &ScoringConfig::default());
        assert_eq!(negative.external_score, 0.0);

        let nan = calculate_score(local(0.0, 0.0, 0.0), f64::NAN, &ScoringConfig::default());
        assert_eq!(nan.external_score, 0.0);
        assert_eq!(nan.final_score, 0.0);
    }

    #[test]
    fn test_raising_any_input_never_lowers_final_score() {
        let config = ScoringConfig::default();
        let base = calculate_score(local(0.2, 0.3, 0.4), 0.5, &config);
        let bumps = [
            calculate_score(local(0.6, 0.3, 0.4), 0.5, &config),
            calculate_score(local(0.2, 0.9, 0.4), 0.5, &config),
            calculate_score(local(0.2, 0.3, 1.0), 0.5, &config),
            calculate_score(local(0.2, 0.3, 0.4), 0.8, &config),
        ];
        for bumped in bumps {
            assert!(bumped.final_score >= base.final_score);
            assert!(bumped.is_match || !base.is_match);
        }
    }
}
