use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};

use super::config::ScorerConfig;
use super::error::ExternalScoringError;
use super::prompt::{parse_similarity_score, user_message, SYSTEM_INSTRUCTION};
use super::SemanticScorer;
use crate::records::{BankRecord, Customer};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

/// Install the ring provider for rustls (required for rustls 0.23+).
/// A provider that is already installed is left in place.
fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Scores record pairs through the Anthropic Messages API.
#[derive(Clone)]
pub struct AnthropicScorer {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    max_retries: usize,
}

impl AnthropicScorer {
    pub fn new(api_key: impl Into<String>, config: &ScorerConfig) -> Result<Self> {
        install_crypto_provider();

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout().context("Invalid scorer timeout")? {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            max_retries: config.max_retries,
        })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    /// One request to the Messages API, returning the first text block.
    async fn call_api(&self, content: &str) -> Result<Option<String>, ExternalScoringError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: SYSTEM_INSTRUCTION,
            messages: [Message {
                role: "user",
                content,
            }],
        };

        let response = self
            .http_client
            .post(self.messages_url())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "scorer request failed");
                ExternalScoringError::Network(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExternalScoringError::Network(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = %status, error = %body, "scorer API error");
            return Err(ExternalScoringError::from_status(status.as_u16(), body));
        }

        match serde_json::from_str::<MessagesResponse>(&body) {
            Ok(parsed) => Ok(parsed.content.into_iter().next().and_then(|block| block.text)),
            Err(e) => {
                tracing::warn!(error = %e, "malformed scorer response envelope");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl SemanticScorer for AnthropicScorer {
    async fn score(
        &self,
        bank: &BankRecord,
        customer: Option<&Customer>,
    ) -> Result<f64, ExternalScoringError> {
        let content = user_message(bank, customer)
            .map_err(|e| ExternalScoringError::Request(format!("{:#}", e)))?;

        let start = Instant::now();

        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(5))
            .take(self.max_retries);

        let text = RetryIf::spawn(
            retry_strategy,
            || self.call_api(&content),
            |e: &ExternalScoringError| e.is_transient(),
        )
        .await?;

        let score = text.as_deref().map_or(0.0, parse_similarity_score);

        tracing::debug!(
            link_id = %bank.link_id,
            model = %self.model,
            duration_ms = start.elapsed().as_millis(),
            score,
            "external score"
        );

        Ok(score)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_new_scorer_uses_config() {
        let config = ScorerConfig {
            model: "claude-test".to_string(),
            base_url: "https://proxy.example.com/".to_string(),
            timeout: Some("5s".to_string()),
            ..Default::default()
        };
        let scorer = AnthropicScorer::new("test-key", &config).unwrap();

        assert_eq!(scorer.model_name(), "claude-test");
        assert_eq!(scorer.messages_url(), "https://proxy.example.com/v1/messages");
        assert_eq!(scorer.max_tokens, 100);
    }

    #[test]
    fn test_new_scorer_rejects_bad_timeout() {
        let config = ScorerConfig {
            timeout: Some("whenever".to_string()),
            ..Default::default()
        };
        assert!(AnthropicScorer::new("test-key", &config).is_err());
    }

    #[test]
    fn test_request_shape() {
        let request = MessagesRequest {
            model: "m",
            max_tokens: 100,
            system: SYSTEM_INSTRUCTION,
            messages: [Message {
                role: "user",
                content: "hello",
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "m");
        assert_eq!(json["max_tokens"], 100);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
        assert!(json["system"].as_str().unwrap().contains("similarityScore"));
    }

    #[test]
    fn test_response_first_block_only() {
        let parsed: MessagesResponse = serde_json::from_str(
            r#"{"content": [
                {"type": "text", "text": "{\"similarityScore\": 0.7}"},
                {"type": "text", "text": "ignored"}
            ]}"#,
        )
        .unwrap();
        let text = parsed.content.into_iter().next().and_then(|b| b.text);
        assert_eq!(text.as_deref().map(parse_similarity_score), Some(0.7));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        let config = ScorerConfig {
            // Port 9 (discard) on localhost is not expected to serve HTTP
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Some("2s".to_string()),
            ..Default::default()
        };
        let scorer = AnthropicScorer::new("test-key", &config).unwrap();
        let bank = BankRecord {
            link_id: "L1".to_string(),
            company_id: "c1".to_string(),
            ..Default::default()
        };

        let err = scorer.score(&bank, None).await.unwrap_err();
        assert!(matches!(err, ExternalScoringError::Network(_)));
    }

    // ── Mock server ─────────────────────────────────────────────────

    fn sample_bank() -> BankRecord {
        BankRecord {
            link_id: "L1".to_string(),
            company_id: "c1".to_string(),
            names: vec!["Jo Doe".to_string()],
            ..Default::default()
        }
    }

    fn mock_scorer(server: &MockServer, max_retries: usize) -> AnthropicScorer {
        let config = ScorerConfig {
            base_url: server.base_url(),
            timeout: Some("5s".to_string()),
            max_retries,
            ..Default::default()
        };
        AnthropicScorer::new("test-key", &config).unwrap()
    }

    fn text_response(texts: &[&str]) -> serde_json::Value {
        let content: Vec<serde_json::Value> = texts
            .iter()
            .map(|t| serde_json::json!({ "type": "text", "text": t }))
            .collect();
        serde_json::json!({ "content": content })
    }

    #[tokio::test]
    async fn test_score_reads_first_block() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/messages")
                    .header("x-api-key", "test-key")
                    .header("anthropic-version", ANTHROPIC_VERSION)
                    .body_includes("\"role\":\"user\"");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(text_response(&[
                        r#"{"similarityScore": 0.7}"#,
                        r#"{"similarityScore": 0.1}"#,
                    ]));
            })
            .await;

        let scorer = mock_scorer(&server, 0);
        let score = scorer.score(&sample_bank(), None).await.unwrap();

        mock.assert_async().await;
        assert_eq!(score, 0.7);
    }

    #[tokio::test]
    async fn test_empty_or_malformed_envelope_scores_zero() {
        for body in [r#"{"content": []}"#, r#"{"content": "oops"}"#, "not json"] {
            let server = MockServer::start_async().await;
            server
                .mock_async(|when, then| {
                    when.method(POST).path("/v1/messages");
                    then.status(200).body(body);
                })
                .await;

            let scorer = mock_scorer(&server, 0);
            let score = scorer.score(&sample_bank(), None).await.unwrap();
            assert_eq!(score, 0.0, "body {:?}", body);
        }
    }

    #[tokio::test]
    async fn test_status_codes_map_to_errors() {
        let server = MockServer::start_async().await;
        let scorer = mock_scorer(&server, 0);

        let mut auth = server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/messages");
                then.status(401).body("invalid x-api-key");
            })
            .await;
        let err = scorer.score(&sample_bank(), None).await.unwrap_err();
        assert!(matches!(err, ExternalScoringError::Auth(ref body) if body.contains("x-api-key")));
        auth.delete_async().await;

        let mut limited = server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/messages");
                then.status(429).body("slow down");
            })
            .await;
        let err = scorer.score(&sample_bank(), None).await.unwrap_err();
        assert!(matches!(err, ExternalScoringError::RateLimited(_)));
        limited.delete_async().await;

        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/messages");
                then.status(400).body("bad request");
            })
            .await;
        let err = scorer.score(&sample_bank(), None).await.unwrap_err();
        assert!(matches!(err, ExternalScoringError::Api { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/messages");
                then.status(503).body("overloaded");
            })
            .await;

        let scorer = mock_scorer(&server, 2);
        let err = scorer.score(&sample_bank(), None).await.unwrap_err();

        assert!(matches!(err, ExternalScoringError::Api { status: 503, .. }));
        mock.assert_calls_async(3).await;
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/messages");
                then.status(403).body("forbidden");
            })
            .await;

        let scorer = mock_scorer(&server, 2);
        let err = scorer.score(&sample_bank(), None).await.unwrap_err();

        assert!(matches!(err, ExternalScoringError::Auth(_)));
        mock.assert_calls_async(1).await;
    }

    #[tokio::test]
    async fn test_default_makes_exactly_one_call() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/messages");
                then.status(500).body("internal");
            })
            .await;

        let scorer = mock_scorer(&server, 0);
        assert!(scorer.score(&sample_bank(), None).await.is_err());
        mock.assert_calls_async(1).await;
    }
}
