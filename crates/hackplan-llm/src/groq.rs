use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::provider::{check_status, LlmProvider, ProviderError};

/// Groq speaks the OpenAI chat-completions dialect behind /openai/v1.
pub struct GroqProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GroqProvider {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            model,
        }
    }

    fn url(&self) -> String {
        format!("{}/openai/v1/chat/completions", self.base_url)
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        debug!(model = %self.model, "sending request to Groq");
        let resp = self
            .client
            .post(self.url())
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;
        let resp = check_status(resp).await.map_err(|e| {
            warn!(err = %e, "Groq API error");
            e
        })?;

        let api_resp: ApiResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;
        Ok(extract_text(api_resp))
    }

    async fn proxy(
        &self,
        body: serde_json::Value,
        key_override: Option<&str>,
    ) -> Result<serde_json::Value, ProviderError> {
        let key = key_override.unwrap_or(&self.api_key);
        let resp = self
            .client
            .post(self.url())
            .bearer_auth(key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        resp.json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

fn extract_text(resp: ApiResponse) -> String {
    resp.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default()
}

// Groq (OpenAI-compatible) response types (private — deserialization only)

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_choice_content() {
        let resp: ApiResponse = serde_json::from_value(serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": "reply" } }
            ]
        }))
        .unwrap();
        assert_eq!(extract_text(resp), "reply");
    }

    #[test]
    fn missing_content_yields_empty_string() {
        let resp: ApiResponse =
            serde_json::from_value(serde_json::json!({ "choices": [] })).unwrap();
        assert_eq!(extract_text(resp), "");
    }

    #[test]
    fn chat_path_is_openai_compatible() {
        let p = GroqProvider::new(
            "gsk_x".into(),
            "https://api.groq.com".into(),
            "llama-3.3-70b-versatile".into(),
        );
        assert_eq!(p.url(), "https://api.groq.com/openai/v1/chat/completions");
    }
}
