//! Built-in planner used when no provider is configured.
//!
//! Keeps first-run task generation working without any API key. The plan is
//! deterministic; `proxy` is unavailable because there is nothing to relay to.

use async_trait::async_trait;

use crate::provider::{LlmProvider, ProviderError};

pub struct MockPlanner;

#[async_trait]
impl LlmProvider for MockPlanner {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        Ok(r#"[
  {"title": "Define scope and split roles", "phase": "planning", "estimated_hours": 1.5, "priority": "high", "required_skill": null},
  {"title": "Sketch data model and API surface", "phase": "planning", "estimated_hours": 2, "priority": "high", "required_skill": null},
  {"title": "Project scaffolding and CI", "phase": "build", "estimated_hours": 2, "priority": "high", "required_skill": "backend"},
  {"title": "Core backend endpoints", "phase": "build", "estimated_hours": 8, "priority": "high", "required_skill": "backend"},
  {"title": "Primary UI flows", "phase": "build", "estimated_hours": 8, "priority": "high", "required_skill": "frontend"},
  {"title": "Integrate frontend with API", "phase": "build", "estimated_hours": 4, "priority": "medium", "required_skill": "frontend"},
  {"title": "Error states and edge cases", "phase": "polish", "estimated_hours": 3, "priority": "medium", "required_skill": null},
  {"title": "Visual polish pass", "phase": "polish", "estimated_hours": 3, "priority": "low", "required_skill": "design"},
  {"title": "Demo script and slides", "phase": "demo", "estimated_hours": 2, "priority": "medium", "required_skill": null},
  {"title": "Dry-run the pitch", "phase": "demo", "estimated_hours": 1, "priority": "high", "required_skill": null}
]"#
        .to_string())
    }

    async fn proxy(
        &self,
        _body: serde_json::Value,
        _key_override: Option<&str>,
    ) -> Result<serde_json::Value, ProviderError> {
        Err(ProviderError::Unavailable(
            "no LLM provider configured — set providers.gemini or providers.groq in hackplan.toml"
                .into(),
        ))
    }
}
