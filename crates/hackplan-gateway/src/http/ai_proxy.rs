//! Raw provider proxies — POST /ai/gemini and POST /ai/groq.
//!
//! The request body is forwarded to the provider's native API untouched and
//! the provider's JSON reply is relayed back. The server-held key is used
//! unless the caller supplies their own via the `x-api-key` header; the
//! server key is never echoed to the client either way.
//!
//! Endpoints require a bearer token — an open relay would leak the server
//! key's quota to anyone.

use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, Json};
use hackplan_core::config::{
    GEMINI_DEFAULT_BASE_URL, GEMINI_DEFAULT_MODEL, GROQ_DEFAULT_BASE_URL, GROQ_DEFAULT_MODEL,
};
use hackplan_llm::{gemini::GeminiProvider, groq::GroqProvider, LlmProvider};
use serde_json::Value;
use tracing::info;

use crate::app::AppState;
use crate::auth::require_user;
use crate::error::ApiError;

pub async fn gemini_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let user_id = require_user(&state, &headers)?;
    let key_override = caller_key(&headers);

    // A caller-supplied key works even without server-side configuration.
    let reply = match (&state.gemini, key_override) {
        (Some(provider), override_key) => provider.proxy(body, override_key).await?,
        (None, Some(key)) => {
            GeminiProvider::new(
                String::new(),
                GEMINI_DEFAULT_BASE_URL.to_string(),
                GEMINI_DEFAULT_MODEL.to_string(),
            )
            .proxy(body, Some(key))
            .await?
        }
        (None, None) => {
            return Err(ApiError::new(
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                "PROVIDER_UNAVAILABLE",
                "Gemini is not configured; supply x-api-key or set providers.gemini",
            ))
        }
    };
    info!(user_id = %user_id, "gemini proxy request relayed");
    Ok(Json(reply))
}

pub async fn groq_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let user_id = require_user(&state, &headers)?;
    let key_override = caller_key(&headers);

    let reply = match (&state.groq, key_override) {
        (Some(provider), override_key) => provider.proxy(body, override_key).await?,
        (None, Some(key)) => {
            GroqProvider::new(
                String::new(),
                GROQ_DEFAULT_BASE_URL.to_string(),
                GROQ_DEFAULT_MODEL.to_string(),
            )
            .proxy(body, Some(key))
            .await?
        }
        (None, None) => {
            return Err(ApiError::new(
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                "PROVIDER_UNAVAILABLE",
                "Groq is not configured; supply x-api-key or set providers.groq",
            ))
        }
    };
    info!(user_id = %user_id, "groq proxy request relayed");
    Ok(Json(reply))
}

fn caller_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
}
