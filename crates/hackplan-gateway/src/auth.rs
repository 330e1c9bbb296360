use axum::http::HeaderMap;
use hackplan_events::Hackathon;

use crate::app::AppState;
use crate::error::ApiError;

/// Resolve the bearer token in `headers` to a user id.
pub fn require_user(state: &AppState, headers: &HeaderMap) -> Result<String, ApiError> {
    let token = extract_bearer(headers).ok_or_else(|| {
        ApiError::unauthorized("Set 'Authorization: Bearer <token>' header (see POST /auth/login)")
    })?;
    state
        .users
        .verify_token(token)
        .map_err(|e| ApiError::unauthorized(e.to_string()))
}

/// Fetch a hackathon and verify the caller owns it.
pub fn require_owned_hackathon(
    state: &AppState,
    headers: &HeaderMap,
    hackathon_id: &str,
) -> Result<(String, Hackathon), ApiError> {
    let user_id = require_user(state, headers)?;
    let hackathon = state.events.get_hackathon(hackathon_id)?;
    if hackathon.owner_id != user_id {
        return Err(ApiError::forbidden("not the owner of this hackathon"));
    }
    Ok((user_id, hackathon))
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}
