//! Model-backed similarity scoring.
//!
//! One call per bank record: the record (minus fraud annotations) and its
//! customer are sent to a text-completion model that answers with
//! `{"similarityScore": number}`.

pub mod anthropic;
pub mod config;
pub mod error;
pub mod prompt;

pub use anthropic::AnthropicScorer;
pub use config::{validate_scorer, ScorerConfig, ScorerFailurePolicy};
pub use error::ExternalScoringError;
pub use prompt::{parse_similarity_score, user_message, SYSTEM_INSTRUCTION};

use async_trait::async_trait;

use crate::records::{BankRecord, Customer};

/// Produces a similarity score in [0, 1] for a bank/customer pair.
///
/// Unparsable answers are not errors: implementations return 0 for them.
/// Transport failures are returned as [`ExternalScoringError`].
#[async_trait]
pub trait SemanticScorer: Send + Sync {
    async fn score(
        &self,
        bank: &BankRecord,
        customer: Option<&Customer>,
    ) -> Result<f64, ExternalScoringError>;

    /// Model name for logging
    fn model_name(&self) -> &str;
}
