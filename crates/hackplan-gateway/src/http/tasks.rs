//! Task CRUD plus dependency and assignment management.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use hackplan_core::types::{TaskPhase, TaskPriority, TaskStatus};
use hackplan_tasks::manager::TaskDraft;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::auth::require_owned_hackathon;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct TaskBody {
    pub title: String,
    #[serde(default = "default_phase")]
    pub phase: String,
    pub estimated_hours: f64,
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub required_skill: Option<String>,
}

fn default_phase() -> String {
    "build".into()
}
fn default_priority() -> String {
    "medium".into()
}
fn default_status() -> String {
    "todo".into()
}

impl TaskBody {
    fn into_draft(self) -> Result<TaskDraft, ApiError> {
        Ok(TaskDraft {
            title: self.title,
            phase: TaskPhase::from_str(&self.phase).map_err(ApiError::bad_request)?,
            estimated_hours: self.estimated_hours,
            priority: TaskPriority::from_str(&self.priority).map_err(ApiError::bad_request)?,
            status: TaskStatus::from_str(&self.status).map_err(ApiError::bad_request)?,
            required_skill: self.required_skill.filter(|s| !s.trim().is_empty()),
        })
    }
}

#[derive(Deserialize)]
pub struct AssignBody {
    pub member_id: String,
}

pub async fn create_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<TaskBody>,
) -> Result<Json<Value>, ApiError> {
    require_owned_hackathon(&state, &headers, &id)?;
    let task = state.tasks.create(&id, body.into_draft()?)?;
    Ok(Json(json!({ "task": task })))
}

pub async fn list_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    require_owned_hackathon(&state, &headers, &id)?;
    let tasks = state.tasks.list_for_hackathon(&id)?;
    let edges = state.tasks.dependency_edges(&id)?;
    let assignments = state.tasks.assignments_for(&id)?;
    Ok(Json(json!({
        "tasks": tasks,
        "dependencies": edges,
        "assignments": assignments,
    })))
}

pub async fn update_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((id, task_id)): Path<(String, String)>,
    Json(body): Json<TaskBody>,
) -> Result<Json<Value>, ApiError> {
    require_owned_hackathon(&state, &headers, &id)?;
    ensure_task_in_hackathon(&state, &id, &task_id)?;
    let task = state.tasks.update(&task_id, body.into_draft()?)?;
    Ok(Json(json!({ "task": task })))
}

pub async fn delete_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((id, task_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    require_owned_hackathon(&state, &headers, &id)?;
    ensure_task_in_hackathon(&state, &id, &task_id)?;
    state.tasks.delete(&task_id)?;
    Ok(Json(json!({ "deleted": task_id })))
}

pub async fn add_dependency_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((id, task_id, dep_id)): Path<(String, String, String)>,
) -> Result<Json<Value>, ApiError> {
    require_owned_hackathon(&state, &headers, &id)?;
    ensure_task_in_hackathon(&state, &id, &task_id)?;
    ensure_task_in_hackathon(&state, &id, &dep_id)?;
    let edge = state.tasks.add_dependency(&task_id, &dep_id)?;
    Ok(Json(json!({ "dependency": edge })))
}

pub async fn remove_dependency_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((id, task_id, dep_id)): Path<(String, String, String)>,
) -> Result<Json<Value>, ApiError> {
    require_owned_hackathon(&state, &headers, &id)?;
    state.tasks.remove_dependency(&task_id, &dep_id)?;
    Ok(Json(json!({ "deleted": { "task_id": task_id, "depends_on": dep_id } })))
}

pub async fn assign_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((id, task_id)): Path<(String, String)>,
    Json(body): Json<AssignBody>,
) -> Result<Json<Value>, ApiError> {
    require_owned_hackathon(&state, &headers, &id)?;
    ensure_task_in_hackathon(&state, &id, &task_id)?;
    // the member must belong to the same hackathon
    let member = state.events.get_member(&body.member_id)?;
    if member.hackathon_id != id {
        return Err(ApiError::forbidden("member belongs to another hackathon"));
    }
    let assignment = state.tasks.assign(&task_id, &body.member_id)?;
    Ok(Json(json!({ "assignment": assignment })))
}

pub async fn unassign_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((id, task_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    require_owned_hackathon(&state, &headers, &id)?;
    state.tasks.unassign(&task_id)?;
    Ok(Json(json!({ "deleted": task_id })))
}

fn ensure_task_in_hackathon(
    state: &AppState,
    hackathon_id: &str,
    task_id: &str,
) -> Result<(), ApiError> {
    let task = state.tasks.get(task_id)?;
    if task.hackathon_id != hackathon_id {
        return Err(ApiError::forbidden("task belongs to another hackathon"));
    }
    Ok(())
}
