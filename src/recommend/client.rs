//! OpenAI chat completion client for recommendations.

use crate::analysis::AnalyzedProduct;
use crate::config::LlmConfig;
use crate::recommend::api::{ChatMessage, ChatRequest, ChatResponse};
use crate::recommend::prompt::{build_prompt, SYSTEM_PROMPT};
use crate::recommend::Recommender;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use wreq::Client;

/// Requests recommendations from an OpenAI-compatible API.
pub struct OpenAiRecommender {
    client: Client,
    config: LlmConfig,
}

impl OpenAiRecommender {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create LLM HTTP client")?;

        Ok(Self { client, config: config.clone() })
    }

    /// Sends one chat completion and returns the first choice's content.
    pub async fn request(&self, query: &str, products: &[AnalyzedProduct]) -> Result<String> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            anyhow::bail!("No API key configured (set OPENAI_API_KEY)");
        };

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(build_prompt(query, products)?),
            ],
            temperature: Some(self.config.temperature),
            max_tokens: Some(self.config.max_tokens),
        };
        let body = serde_json::to_string(&request).context("Failed to serialize request")?;

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        debug!("POST {} (model {})", url, self.config.model);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .context("Failed to send chat completion request")?;

        let status = response.status();
        let text = response.text().await.context("Failed to read chat completion response")?;

        if !status.is_success() {
            anyhow::bail!("Chat completion failed with status {}: {}", status, text);
        }

        let parsed: ChatResponse =
            serde_json::from_str(&text).context("Failed to parse chat completion response")?;

        parsed.first_content().context("Chat completion returned no content")
    }
}

#[async_trait]
impl Recommender for OpenAiRecommender {
    async fn recommend(&self, query: &str, products: &[AnalyzedProduct]) -> Option<String> {
        if self.config.api_key.is_none() {
            warn!("OPENAI_API_KEY is not set, skipping recommendation");
            return None;
        }

        info!("Requesting recommendation for {} products", products.len());
        match self.request(query, products).await {
            Ok(content) => Some(content),
            Err(e) => {
                error!("Error getting AI recommendation: {:#}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_config(server: &MockServer) -> LlmConfig {
        LlmConfig {
            api_key: Some("sk-test".to_string()),
            base_url: format!("{}/v1", server.uri()),
            ..LlmConfig::default()
        }
    }

    fn completion(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "model": "gpt-3.5-turbo",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
    }

    #[tokio::test]
    async fn test_recommend_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-3.5-turbo",
                "max_tokens": 1000
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion("1. Recommended Product: Mouse A")),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let recommender = OpenAiRecommender::new(&make_config(&mock_server)).unwrap();
        let result = recommender.recommend("a mouse", &[]).await;
        assert_eq!(result.as_deref(), Some("1. Recommended Product: Mouse A"));
    }

    #[tokio::test]
    async fn test_user_prompt_is_sent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
            .mount(&mock_server)
            .await;

        let recommender = OpenAiRecommender::new(&make_config(&mock_server)).unwrap();
        recommender.request("usb hub", &[]).await.unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "You are a helpful AI shopping assistant.");
        let user = body["messages"][1]["content"].as_str().unwrap();
        assert!(user.starts_with("I'm looking to buy usb hub."));
        assert_eq!(body["messages"][1]["role"], "user");
    }

    #[tokio::test]
    async fn test_api_error_is_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limit exceeded"))
            .mount(&mock_server)
            .await;

        let recommender = OpenAiRecommender::new(&make_config(&mock_server)).unwrap();
        let err = recommender.request("x", &[]).await.unwrap_err();
        assert!(err.to_string().contains("429"));
        assert!(recommender.recommend("x", &[]).await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_response_is_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let recommender = OpenAiRecommender::new(&make_config(&mock_server)).unwrap();
        assert!(recommender.recommend("x", &[]).await.is_none());
    }

    #[tokio::test]
    async fn test_empty_choices_is_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&mock_server)
            .await;

        let recommender = OpenAiRecommender::new(&make_config(&mock_server)).unwrap();
        let err = recommender.request("x", &[]).await.unwrap_err();
        assert!(err.to_string().contains("no content"));
    }

    #[tokio::test]
    async fn test_missing_api_key_skips_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
            .expect(0)
            .mount(&mock_server)
            .await;

        let config = LlmConfig { api_key: None, ..make_config(&mock_server) };
        let recommender = OpenAiRecommender::new(&config).unwrap();
        assert!(recommender.recommend("x", &[]).await.is_none());
    }
}
