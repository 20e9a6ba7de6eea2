use super::config::ScoringConfig;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (field, weight) in [
        ("local_weight", config.local_weight),
        ("external_weight", config.external_weight),
    ] {
        if let Some(w) = weight {
            if !w.is_finite() {
                errors.push(format!("scoring.{}: must be a finite number", field));
            } else if w < 0.0 {
                errors.push(format!("scoring.{}: must be non-negative", field));
            }
        }
    }

    if errors.is_empty() && config.local_weight() + config.external_weight() <= 0.0 {
        errors.push("scoring: local_weight and external_weight cannot both be zero".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
