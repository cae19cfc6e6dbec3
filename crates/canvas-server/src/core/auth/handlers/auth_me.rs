use crate::core::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::Result;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::super::Profile;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub message: &'static str,
    pub profile: Profile,
}

/// GET /users/profile
pub async fn profile(State(state): State<AppState>, ctx: Ctx) -> Result<Json<ProfileResponse>> {
    // Identity comes from the verified token via middleware, never the request.
    let profile = state.credentials.profile(ctx.user_id()).await?;

    Ok(Json(ProfileResponse {
        message: "User Profile retrieved successfully",
        profile,
    }))
}
