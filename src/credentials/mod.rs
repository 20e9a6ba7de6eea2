use thiserror::Error;

/// Environment variable holding the external scorer's API key
pub const ENV_API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("{0} is not set. Export it or add it to a .env file")]
    Missing(&'static str),
}

/// Load variables from a `.env` file in the working directory, if present.
/// Variables already set in the environment win.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "failed to read .env file"),
    }
}

/// Read the API key from `var`. Returns None if unset or blank.
pub fn get_api_key_from(var: &str) -> Option<String> {
    match std::env::var(var) {
        Ok(val) => {
            let trimmed = val.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

/// Get the external scorer API key, failing if it is missing.
pub fn require_api_key() -> Result<String, CredentialError> {
    get_api_key_from(ENV_API_KEY_VAR).ok_or(CredentialError::Missing(ENV_API_KEY_VAR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_env_trims() {
        let var = "BANK_RECON_TEST_KEY_TRIM";
        std::env::set_var(var, "  sk-test  ");
        assert_eq!(get_api_key_from(var), Some("sk-test".to_string()));
        std::env::remove_var(var);
    }

    #[test]
    fn test_blank_key_is_missing() {
        let var = "BANK_RECON_TEST_KEY_BLANK";
        std::env::set_var(var, "   ");
        assert_eq!(get_api_key_from(var), None);
        std::env::remove_var(var);
    }

    #[test]
    fn test_unset_key_is_missing() {
        assert_eq!(get_api_key_from("BANK_RECON_TEST_KEY_UNSET"), None);
    }

    #[test]
    fn test_missing_error_names_variable() {
        let err = CredentialError::Missing(ENV_API_KEY_VAR);
        assert!(err.to_string().starts_with("ANTHROPIC_API_KEY is not set"));
    }
}
