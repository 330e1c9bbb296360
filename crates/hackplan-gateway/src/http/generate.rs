//! LLM-assisted task drafting — POST /hackathons/{id}/tasks/generate.
//!
//! Request: `{"idea": "AI recipe app", "dry_run": false}`
//!
//! The configured provider (or the built-in mock when none is set) breaks
//! the idea into phased tasks. Unless `dry_run` is set, the drafts are
//! persisted and returned as real tasks.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use hackplan_core::types::{TaskPhase, TaskPriority, TaskStatus};
use hackplan_llm::plan;
use hackplan_tasks::manager::TaskDraft;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::app::AppState;
use crate::auth::require_owned_hackathon;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct GenerateRequest {
    pub idea: String,
    /// When true, return the drafts without persisting them.
    #[serde(default)]
    pub dry_run: bool,
}

pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<Value>, ApiError> {
    let (_, hackathon) = require_owned_hackathon(&state, &headers, &id)?;
    if req.idea.trim().is_empty() {
        return Err(ApiError::bad_request("idea cannot be empty"));
    }

    let team_size = state.events.list_members(&id)?.len().max(1);
    let drafts = plan::generate_plan(
        state.planner.as_ref(),
        &req.idea,
        hackathon.duration_hours,
        team_size,
    )
    .await?;

    info!(
        hackathon_id = %id,
        provider = state.planner.name(),
        count = drafts.len(),
        "task plan generated"
    );

    if req.dry_run {
        return Ok(Json(json!({ "provider": state.planner.name(), "drafts": drafts })));
    }

    let mut tasks = Vec::with_capacity(drafts.len());
    for d in drafts {
        let draft = TaskDraft {
            title: d.title,
            // free-form model output; unknown labels fall back to mid values
            phase: TaskPhase::from_str(&d.phase).unwrap_or(TaskPhase::Build),
            estimated_hours: d.estimated_hours,
            priority: TaskPriority::from_str(&d.priority).unwrap_or(TaskPriority::Medium),
            status: TaskStatus::Todo,
            required_skill: d.required_skill.filter(|s| !s.trim().is_empty()),
        };
        tasks.push(state.tasks.create(&id, draft)?);
    }

    Ok(Json(json!({ "provider": state.planner.name(), "tasks": tasks })))
}
