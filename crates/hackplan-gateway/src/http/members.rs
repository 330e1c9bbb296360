//! Team member CRUD — /hackathons/{id}/members.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use hackplan_events::manager::MemberDraft;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::app::AppState;
use crate::auth::require_owned_hackathon;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct MemberBody {
    pub name: String,
    /// Minutes from midnight on the event's wall clock, 0..1440.
    /// start == end means the member has no sleep window.
    #[serde(default)]
    pub sleep_start_min: u32,
    #[serde(default)]
    pub sleep_end_min: u32,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl From<MemberBody> for MemberDraft {
    fn from(b: MemberBody) -> Self {
        MemberDraft {
            name: b.name,
            sleep_start_min: b.sleep_start_min,
            sleep_end_min: b.sleep_end_min,
            skills: b.skills,
        }
    }
}

pub async fn add_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<MemberBody>,
) -> Result<Json<Value>, ApiError> {
    require_owned_hackathon(&state, &headers, &id)?;
    let member = state.events.add_member(&id, body.into())?;
    Ok(Json(json!({ "member": member })))
}

pub async fn list_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    require_owned_hackathon(&state, &headers, &id)?;
    let members = state.events.list_members(&id)?;
    Ok(Json(json!({ "members": members })))
}

pub async fn update_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((id, member_id)): Path<(String, String)>,
    Json(body): Json<MemberBody>,
) -> Result<Json<Value>, ApiError> {
    require_owned_hackathon(&state, &headers, &id)?;
    ensure_member_in_hackathon(&state, &id, &member_id)?;
    let member = state.events.update_member(&member_id, body.into())?;
    Ok(Json(json!({ "member": member })))
}

pub async fn remove_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((id, member_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    require_owned_hackathon(&state, &headers, &id)?;
    ensure_member_in_hackathon(&state, &id, &member_id)?;
    state.events.remove_member(&member_id)?;
    Ok(Json(json!({ "deleted": member_id })))
}

/// Guard against cross-hackathon member ids in the path.
fn ensure_member_in_hackathon(
    state: &AppState,
    hackathon_id: &str,
    member_id: &str,
) -> Result<(), ApiError> {
    let member = state.events.get_member(member_id)?;
    if member.hackathon_id != hackathon_id {
        return Err(ApiError::forbidden("member belongs to another hackathon"));
    }
    Ok(())
}
