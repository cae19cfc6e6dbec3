//! Auth handlers

use crate::core::config::AppState;
use crate::core::error::Result;
use crate::core::payload::Payload;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::super::UserInfo;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
}

/// POST /users/register
pub async fn register(
    State(state): State<AppState>,
    Payload(req): Payload<RegisterRequest>,
) -> Result<(StatusCode, Json<UserInfo>)> {
    info!("POST /users/register - {}", req.email);

    let user = state
        .credentials
        .register(&req.name, &req.email, &req.password)
        .await
        .inspect_err(|e| warn!("Registration failed for {}: {}", req.email, e))?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /users/login
pub async fn login(
    State(state): State<AppState>,
    Payload(req): Payload<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    info!("POST /users/login - {}", req.email);

    let user = state
        .credentials
        .authenticate(&req.email, &req.password)
        .await
        .inspect_err(|e| warn!("Login failed for {}: {}", req.email, e))?;

    let token = state.tokens.issue(&user.id, &user.email)?;

    Ok(Json(LoginResponse {
        message: "Login successful",
        token,
    }))
}
