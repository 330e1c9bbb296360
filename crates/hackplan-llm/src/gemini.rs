use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::provider::{check_status, LlmProvider, ProviderError};

pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            model,
        }
    }

    fn url(&self, key: &str) -> String {
        // Gemini authenticates via a query parameter, not a header.
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, key
        )
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        debug!(model = %self.model, "sending request to Gemini");
        let resp = self
            .client
            .post(self.url(&self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;
        let resp = check_status(resp).await.map_err(|e| {
            warn!(err = %e, "Gemini API error");
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
            .post(self.url(key))
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

/// Concatenate the text parts of the first candidate.
fn extract_text(resp: ApiResponse) -> String {
    resp.candidates
        .into_iter()
        .next()
        .map(|c| {
            c.content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

// Gemini API response types (private — deserialization only)

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_candidate_text() {
        let resp: ApiResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                { "content": { "parts": [ { "text": "hello " }, { "text": "world" } ] } },
                { "content": { "parts": [ { "text": "ignored" } ] } }
            ]
        }))
        .unwrap();
        assert_eq!(extract_text(resp), "hello world");
    }

    #[test]
    fn empty_candidates_yield_empty_string() {
        let resp: ApiResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(extract_text(resp), "");
    }

    #[test]
    fn key_override_changes_the_query_param() {
        let p = GeminiProvider::new(
            "server-key".into(),
            "https://generativelanguage.googleapis.com".into(),
            "gemini-2.0-flash".into(),
        );
        assert!(p.url("server-key").ends_with("key=server-key"));
        assert!(p.url("user-key").ends_with("key=user-key"));
    }
}
