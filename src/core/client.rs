//! Async OpenRouter client with retry and backoff

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::core::config::RunConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{Completion, Prompt, RowOutcome};

/// A client capable of resolving one prompt to one row outcome.
///
/// This is the seam the dispatcher depends on; tests substitute scripted
/// implementations without any network.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Resolve one prompt to exactly one outcome.
    ///
    /// Never returns an error: failures are converted into
    /// [`RowOutcome::Failure`] so aggregation cannot stall on a bad row.
    async fn complete(&self, prompt: &Prompt) -> RowOutcome;
}

/// OpenRouter chat-completions client
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    config: Arc<RunConfig>,
}

impl OpenRouterClient {
    /// Create a new client from a validated configuration
    pub fn new(config: RunConfig) -> Result<Self> {
        config.validate()?;

        let timeout = Duration::from_millis(config.timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Resolve one prompt, retrying transient failures per the policy
    async fn complete_with_retry(&self, prompt: &Prompt) -> Result<Completion> {
        let policy = self.config.retry;
        let mut last_error = None;

        for attempt in 1..=policy.max_attempts {
            if attempt > 1 {
                let delay = policy.delay_for(attempt - 1);
                debug!("Retry attempt {} after {:?}", attempt, delay);
                sleep(delay).await;
            }

            match self.send_request(prompt).await {
                Ok(completion) => {
                    if attempt > 1 {
                        debug!("Request succeeded after {} attempts", attempt);
                    }
                    return Ok(completion);
                }
                Err(e) => {
                    if !e.is_transient() {
                        return Err(e);
                    }
                    warn!(
                        "Transient failure on attempt {}/{}: {}",
                        attempt, policy.max_attempts, e
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap())
    }

    /// Send a single request to the completions endpoint
    async fn send_request(&self, prompt: &Prompt) -> Result<Completion> {
        let body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "top_p": 0.9,
            "data_collection": "deny",
            "messages": prompt,
            "usage": { "include": true },
            "reasoning": { "effort": "low", "exclude": false },
        });

        let response = self
            .client
            .post(&self.config.api_endpoint)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranslationError::TimeoutError
                } else {
                    TranslationError::NetworkError {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            if status.as_u16() == 429 {
                return Err(TranslationError::RateLimited);
            }

            let message = response.text().await.unwrap_or_default();
            return Err(TranslationError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| TranslationError::InvalidResponse {
                    message: e.to_string(),
                })?;

        let choice =
            body.choices
                .into_iter()
                .next()
                .ok_or_else(|| TranslationError::InvalidResponse {
                    message: "no choices in response".to_string(),
                })?;

        let text = choice
            .message
            .content
            .ok_or_else(|| TranslationError::InvalidResponse {
                message: "no content in first choice".to_string(),
            })?;

        let usage = body.usage.unwrap_or_default();

        Ok(Completion {
            text,
            reasoning: choice.message.reasoning,
            cost: usage
                .cost_details
                .and_then(|c| c.upstream_inference_completions_cost),
            reasoning_tokens: usage
                .completion_tokens_details
                .and_then(|d| d.reasoning_tokens),
        })
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(&self, prompt: &Prompt) -> RowOutcome {
        match self.complete_with_retry(prompt).await {
            Ok(completion) => RowOutcome::Success(completion),
            Err(e) => {
                warn!("Request failed: {}", e);
                RowOutcome::failure(e.to_string())
            }
        }
    }
}

/// Non-streaming chat-completions response, reduced to the fields we read
#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    reasoning: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct Usage {
    #[serde(default)]
    cost_details: Option<CostDetails>,
    #[serde(default)]
    completion_tokens_details: Option<CompletionTokensDetails>,
}

#[derive(Deserialize, Debug)]
struct CostDetails {
    #[serde(default)]
    upstream_inference_completions_cost: Option<f64>,
}

#[derive(Deserialize, Debug)]
struct CompletionTokensDetails {
    #[serde(default)]
    reasoning_tokens: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ChatMessage;
    use crate::core::retry::RetryPolicy;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ENDPOINT_PATH: &str = "/api/v1/chat/completions";

    fn test_config(server: &MockServer) -> RunConfig {
        RunConfig {
            model: "test/model".to_string(),
            api_key: "test_key".to_string(),
            api_endpoint: format!("{}{}", server.uri(), ENDPOINT_PATH),
            max_tokens: 64,
            temperature: 0.0,
            max_concurrent: 2,
            timeout_ms: 5_000,
            retry: RetryPolicy {
                max_attempts: 3,
                base_delay_ms: 10,
                multiplier: 2,
            },
        }
    }

    fn test_prompt() -> Prompt {
        vec![
            ChatMessage::system("translate"),
            ChatMessage::user("<Il sindaco approva>. German: "),
        ]
    }

    fn success_body() -> serde_json::Value {
        json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "<Der Bürgermeister genehmigt>",
                    "reasoning": "picked the constrained term"
                }
            }],
            "usage": {
                "cost_details": { "upstream_inference_completions_cost": 0.00042 },
                "completion_tokens_details": { "reasoning_tokens": 17 }
            }
        })
    }

    async fn requests_received(server: &MockServer) -> usize {
        server.received_requests().await.unwrap_or_default().len()
    }

    #[tokio::test]
    async fn test_success_parses_completion_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
            .mount(&server)
            .await;

        let client = OpenRouterClient::new(test_config(&server)).unwrap();
        let outcome = client.complete(&test_prompt()).await;

        match outcome {
            RowOutcome::Success(completion) => {
                assert_eq!(completion.text, "<Der Bürgermeister genehmigt>");
                assert_eq!(
                    completion.reasoning.as_deref(),
                    Some("picked the constrained term")
                );
                assert_eq!(completion.cost, Some(0.00042));
                assert_eq!(completion.reasoning_tokens, Some(17));
            }
            RowOutcome::Failure { error } => panic!("expected success, got failure: {error}"),
        }
    }

    #[tokio::test]
    async fn test_transient_failures_exhaust_retry_ceiling() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT_PATH))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = OpenRouterClient::new(test_config(&server)).unwrap();
        let outcome = client.complete(&test_prompt()).await;

        assert!(!outcome.is_success());
        assert_eq!(requests_received(&server).await, 3);
    }

    #[tokio::test]
    async fn test_succeeds_on_third_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT_PATH))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
            .mount(&server)
            .await;

        let client = OpenRouterClient::new(test_config(&server)).unwrap();
        let outcome = client.complete(&test_prompt()).await;

        assert!(outcome.is_success());
        assert_eq!(requests_received(&server).await, 3);
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT_PATH))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
            .mount(&server)
            .await;

        let client = OpenRouterClient::new(test_config(&server)).unwrap();
        let outcome = client.complete(&test_prompt()).await;

        assert!(outcome.is_success());
        assert_eq!(requests_received(&server).await, 2);
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
            .mount(&server)
            .await;

        let client = OpenRouterClient::new(test_config(&server)).unwrap();
        let outcome = client.complete(&test_prompt()).await;

        assert!(!outcome.is_success());
        assert_eq!(requests_received(&server).await, 1);
    }

    #[tokio::test]
    async fn test_malformed_body_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = OpenRouterClient::new(test_config(&server)).unwrap();
        let outcome = client.complete(&test_prompt()).await;

        match outcome {
            RowOutcome::Failure { error } => assert!(error.contains("Invalid response")),
            RowOutcome::Success(_) => panic!("expected failure on malformed body"),
        }
        assert_eq!(requests_received(&server).await, 1);
    }

    #[tokio::test]
    async fn test_empty_choices_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let client = OpenRouterClient::new(test_config(&server)).unwrap();
        let outcome = client.complete(&test_prompt()).await;

        assert!(!outcome.is_success());
        assert_eq!(requests_received(&server).await, 1);
    }
}
