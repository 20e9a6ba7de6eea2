use anyhow::{Context, Result};
use serde_json::Value;

use crate::records::{BankRecord, Customer};

/// Fixed instruction sent as the system prompt on every call.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert in determining the similarity score between a bank account and a customer account. You only respond in JSON with the format {similarityScore: number} without any pretext, or other text.";

/// Build the user message embedding both records as JSON.
/// The bank record is serialized without its fraud annotations.
pub fn user_message(bank: &BankRecord, customer: Option<&Customer>) -> Result<String> {
    let bank_json =
        serde_json::to_string(&bank.scoring_view()).context("Failed to serialize bank record")?;
    let customer_json =
        serde_json::to_string(&customer).context("Failed to serialize customer record")?;

    Ok(format!(
        "Determine the similarity between the following bank <bank>{}</bank> and <customer> {}</customer>",
        bank_json, customer_json
    ))
}

/// Extract `similarityScore` from a model answer.
///
/// Anything that is not a JSON object with a numeric `similarityScore`
/// yields 0. A surrounding markdown code fence is tolerated.
pub fn parse_similarity_score(text: &str) -> f64 {
    let body = strip_code_fence(text.trim());
    match serde_json::from_str::<Value>(body) {
        Ok(value) => value
            .get("similarityScore")
            .and_then(Value::as_f64)
            .unwrap_or(0.0),
        Err(e) => {
            tracing::debug!(error = %e, response = %text, "unparsable scorer response");
            0.0
        }
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an optional language tag on the opening fence
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
