use async_trait::async_trait;

/// Common interface for LLM providers (Gemini, Groq, the built-in mock).
///
/// Two entry points: `generate` for prompt → text (task drafting) and
/// `proxy` for raw body relay (the /ai/* endpoints forward the caller's
/// JSON untouched and return the provider's JSON untouched).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging and error messages.
    fn name(&self) -> &str;

    /// Send a plain text prompt, return the model's text reply.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Relay a raw request body to the provider's native API and return the
    /// raw response body. `key_override` replaces the server-held key for
    /// this one request (caller-supplied keys are never stored).
    async fn proxy(
        &self,
        body: serde_json::Value,
        key_override: Option<&str>,
    ) -> Result<serde_json::Value, ProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

/// Shared non-2xx handling: 429 becomes `RateLimited` with the server's
/// retry-after hint, everything else becomes `Api`.
pub(crate) async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = resp.status().as_u16();
    if status == 429 {
        let retry = resp
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .map(|s| s * 1000)
            .unwrap_or(5000);
        return Err(ProviderError::RateLimited {
            retry_after_ms: retry,
        });
    }
    if !resp.status().is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err(ProviderError::Api {
            status,
            message: text,
        });
    }
    Ok(resp)
}
