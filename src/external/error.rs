use thiserror::Error;

/// Failure to obtain a score from the external service.
#[derive(Debug, Error)]
pub enum ExternalScoringError {
    /// Connection failed, timed out, or the body could not be read
    #[error("Network error: {0}")]
    Network(String),

    /// Credential rejected (401/403)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Too many requests (429)
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Any other non-2xx response
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Request could not be built (e.g. serialization failed)
    #[error("Request error: {0}")]
    Request(String),
}

impl ExternalScoringError {
    /// Map a non-success HTTP status to the matching variant.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => ExternalScoringError::Auth(body),
            429 => ExternalScoringError::RateLimited(body),
            _ => ExternalScoringError::Api { status, body },
        }
    }

    /// Whether a retry has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            ExternalScoringError::Network(_) | ExternalScoringError::RateLimited(_) => true,
            ExternalScoringError::Api { status, .. } => *status >= 500,
            ExternalScoringError::Auth(_) | ExternalScoringError::Request(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(matches!(
            ExternalScoringError::from_status(401, String::new()),
            ExternalScoringError::Auth(_)
        ));
        assert!(matches!(
            ExternalScoringError::from_status(429, String::new()),
            ExternalScoringError::RateLimited(_)
        ));
        assert!(matches!(
            ExternalScoringError::from_status(400, "bad".to_string()),
            ExternalScoringError::Api { status: 400, .. }
        ));
    }

    #[test]
    fn test_transient_classification() {
        assert!(ExternalScoringError::Network("reset".into()).is_transient());
        assert!(ExternalScoringError::RateLimited("slow down".into()).is_transient());
        assert!(ExternalScoringError::from_status(529, "overloaded".into()).is_transient());
        assert!(!ExternalScoringError::Auth("bad key".into()).is_transient());
        assert!(!ExternalScoringError::from_status(400, "bad".into()).is_transient());
    }

    #[test]
    fn test_display() {
        let err = ExternalScoringError::from_status(500, "boom".to_string());
        assert_eq!(err.to_string(), "API error 500: boom");
    }
}
