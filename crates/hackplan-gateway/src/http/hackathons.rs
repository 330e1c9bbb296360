//! Hackathon CRUD — /hackathons and /hackathons/{id}.
//!
//! All routes require a bearer token; everything except creation is
//! owner-only.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use chrono::{DateTime, Utc};
use hackplan_events::manager::HackathonDraft;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::app::AppState;
use crate::auth::{require_owned_hackathon, require_user};
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct HackathonBody {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// RFC3339, e.g. "2026-09-04T18:00:00Z".
    pub starts_at: String,
    pub duration_hours: u32,
}

impl HackathonBody {
    fn into_draft(self) -> Result<HackathonDraft, ApiError> {
        let starts_at: DateTime<Utc> = self
            .starts_at
            .parse()
            .map_err(|_| ApiError::bad_request("starts_at must be RFC3339"))?;
        Ok(HackathonDraft {
            name: self.name,
            description: self.description,
            starts_at,
            duration_hours: self.duration_hours,
        })
    }
}

pub async fn create_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<HackathonBody>,
) -> Result<Json<Value>, ApiError> {
    let user_id = require_user(&state, &headers)?;
    let hackathon = state
        .events
        .create_hackathon(&user_id, body.into_draft()?)?;
    Ok(Json(json!({ "hackathon": hackathon })))
}

pub async fn list_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user_id = require_user(&state, &headers)?;
    let hackathons = state.events.list_for_owner(&user_id)?;
    Ok(Json(json!({ "hackathons": hackathons })))
}

pub async fn get_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let (_, hackathon) = require_owned_hackathon(&state, &headers, &id)?;
    Ok(Json(json!({ "hackathon": hackathon })))
}

pub async fn update_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<HackathonBody>,
) -> Result<Json<Value>, ApiError> {
    require_owned_hackathon(&state, &headers, &id)?;
    let hackathon = state.events.update_hackathon(&id, body.into_draft()?)?;
    Ok(Json(json!({ "hackathon": hackathon })))
}

pub async fn delete_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    require_owned_hackathon(&state, &headers, &id)?;
    // task rows reference the hackathon from another store; delete them first
    for task in state.tasks.list_for_hackathon(&id)? {
        state.tasks.delete(&task.id)?;
    }
    state.events.delete_hackathon(&id)?;
    Ok(Json(json!({ "deleted": id })))
}
