//! OpenAI-compatible adapter for conversation summaries.
//!
//! Supports OpenAI API, Azure OpenAI, and local Ollama instances.
//! Implements `AiPort` as a plain-text chat completion.

use crate::domain::{DomainError, SummaryRequest};
use crate::ports::AiPort;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// OpenAI-compatible AI adapter.
///
/// Can be configured to work with:
/// - OpenAI API (api.openai.com)
/// - Azure OpenAI
/// - Ollama (localhost)
/// - Any OpenAI-compatible API
pub struct OpenAiAdapter {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiAdapter {
    /// Create a new OpenAI adapter.
    ///
    /// # Arguments
    /// * `api_url` - API endpoint (e.g., "https://api.openai.com/v1/chat/completions")
    /// * `api_key` - API key (can be empty for local Ollama)
    /// * `model` - Model name (e.g., "gpt-4o-mini", "llama3.2")
    /// * `timeout` - Whole-request timeout applied by the HTTP client
    pub fn new(
        api_url: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Ai(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }

    fn build_request(&self, request: &SummaryRequest) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system_instruction.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.user_prompt.clone(),
                },
            ],
        }
    }

    /// First choice's content, trimmed. Empty or missing content is a failure.
    fn extract_summary(response: ChatResponse) -> Result<String, DomainError> {
        let summary = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .ok_or_else(|| DomainError::Ai("No response choices returned".to_string()))?;
        if summary.is_empty() {
            return Err(DomainError::Ai("Empty completion content".to_string()));
        }
        Ok(summary)
    }
}

/// OpenAI API request structure.
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI API response structure.
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: Option<String>,
}

#[async_trait::async_trait]
impl AiPort for OpenAiAdapter {
    async fn summarize(&self, request: &SummaryRequest) -> Result<String, DomainError> {
        debug!(
            prompt_len = request.user_prompt.len(),
            model = %self.model,
            "sending context to AI for summarization"
        );

        let body = self.build_request(request);

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::Ai(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "AI API returned error");
            return Err(DomainError::Ai(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Ai(format!("Failed to parse API response: {}", e)))?;

        let summary = Self::extract_summary(chat_response)?;
        debug!(summary_len = summary.len(), "summarization complete");

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> OpenAiAdapter {
        OpenAiAdapter::new(
            "http://localhost:0/v1/chat/completions".to_string(),
            "sk-test".to_string(),
            "gpt-4o-mini".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_request_shape() {
        let req = SummaryRequest {
            system_instruction: "persona".to_string(),
            user_prompt: "template\n\nline\n".to_string(),
        };
        let json = serde_json::to_value(adapter().build_request(&req)).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "persona");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "template\n\nline\n");
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn test_extract_summary() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"  A summary.\n"}}]}"#;
        let resp: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(OpenAiAdapter::extract_summary(resp).unwrap(), "A summary.");
    }

    #[test]
    fn test_extract_summary_no_choices() {
        let resp: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            OpenAiAdapter::extract_summary(resp),
            Err(DomainError::Ai(_))
        ));
    }

    #[test]
    fn test_extract_summary_null_content() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        let resp: ChatResponse = serde_json::from_str(raw).unwrap();
        assert!(OpenAiAdapter::extract_summary(resp).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_ai_error() {
        let req = SummaryRequest {
            system_instruction: "persona".to_string(),
            user_prompt: "hi".to_string(),
        };
        let err = adapter().summarize(&req).await.unwrap_err();
        assert!(matches!(err, DomainError::Ai(_)));
    }
}
