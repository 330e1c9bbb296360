//! Scheduling endpoints.
//!
//! POST /hackathons/{id}/schedule runs the placement engine over the current
//! tasks/members/dependencies and returns the computed blocks. Nothing is
//! persisted — the schedule is a pure function of the stored data.
//!
//! GET /hackathons/{id}/calendar?view=day|week&date=YYYY-MM-DD serves the
//! same schedule grouped for calendar rendering.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use chrono::NaiveDate;
use hackplan_events::Hackathon;
use hackplan_scheduler::{build_schedule, calendar, Schedule, ScheduleInput};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::app::AppState;
use crate::auth::require_owned_hackathon;
use crate::error::ApiError;

pub async fn schedule_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let (_, hackathon) = require_owned_hackathon(&state, &headers, &id)?;
    let schedule = compute(&state, &hackathon)?;
    info!(
        hackathon_id = %id,
        blocks = schedule.blocks.len(),
        unplaced = schedule.unplaced.len(),
        "schedule computed"
    );
    Ok(Json(json!({
        "schedule": schedule,
        "window": { "starts_at": hackathon.starts_at, "ends_at": hackathon.ends_at() },
    })))
}

#[derive(Deserialize)]
pub struct CalendarQuery {
    /// "day" or "week" (default).
    #[serde(default = "default_view")]
    pub view: String,
    /// First day shown; defaults to the hackathon's start date.
    pub date: Option<NaiveDate>,
}

fn default_view() -> String {
    "week".into()
}

pub async fn calendar_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<Value>, ApiError> {
    let (_, hackathon) = require_owned_hackathon(&state, &headers, &id)?;
    let schedule = compute(&state, &hackathon)?;
    let date = query.date.unwrap_or_else(|| hackathon.starts_at.date_naive());

    match query.view.as_str() {
        "day" => {
            let blocks = calendar::day_view(&schedule, date);
            Ok(Json(json!({
                "view": "day",
                "date": date,
                "blocks": blocks,
                "unplaced": schedule.unplaced,
            })))
        }
        "week" => {
            let days: Vec<Value> = calendar::week_view(&schedule, date)
                .into_iter()
                .enumerate()
                .map(|(i, blocks)| {
                    json!({
                        "date": date + chrono::Duration::days(i as i64),
                        "blocks": blocks,
                    })
                })
                .collect();
            Ok(Json(json!({ "view": "week", "days": days, "unplaced": schedule.unplaced })))
        }
        other => Err(ApiError::bad_request(format!(
            "unknown view '{other}' (expected day or week)"
        ))),
    }
}

/// Gather stored rows into a `ScheduleInput` and run the engine.
fn compute(state: &AppState, hackathon: &Hackathon) -> Result<Schedule, ApiError> {
    let input = ScheduleInput {
        starts_at: hackathon.starts_at,
        duration_hours: hackathon.duration_hours,
        members: state.events.list_members(&hackathon.id)?,
        tasks: state.tasks.list_for_hackathon(&hackathon.id)?,
        edges: state.tasks.dependency_edges(&hackathon.id)?,
        assignments: state.tasks.assignments_for(&hackathon.id)?,
        slot_minutes: state.config.scheduler.slot_minutes,
    };
    Ok(build_schedule(&input)?)
}
