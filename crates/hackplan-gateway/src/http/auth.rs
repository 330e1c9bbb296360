//! Account endpoints — POST /auth/register and POST /auth/login.
//!
//! Register: `{"email", "display_name", "password"}` → `{"user": {...}}`
//! Login:    `{"email", "password"}` → `{"user": {...}, "token": "..."}`

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub display_name: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<Value>, ApiError> {
    if req.password.len() < 8 {
        return Err(ApiError::bad_request(
            "password must be at least 8 characters",
        ));
    }
    if !req.email.contains('@') {
        return Err(ApiError::bad_request("email looks invalid"));
    }
    let user = state
        .users
        .register(&req.email, &req.display_name, &req.password)?;
    info!(user_id = %user.id, "account created via HTTP");
    Ok(Json(json!({ "user": user })))
}

pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let (user, token) = state.users.login(&req.email, &req.password)?;
    Ok(Json(json!({ "user": user, "token": token })))
}
