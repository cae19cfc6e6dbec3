//! Canvas handlers
//!
//! Identity always comes from [`Ctx`]; payloads carry no user ids.

use crate::core::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::Result;
use crate::core::payload::Payload;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::models::{Canvas, CanvasSummary};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub elements: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateCanvasRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCanvasRequest {
    pub elements: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareCanvasRequest {
    pub shared_with_email: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// GET /canvas
pub async fn list_canvases(
    State(state): State<AppState>,
    ctx: Ctx,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CanvasSummary>>> {
    info!("GET /canvas - {}", ctx.email());
    let canvases = state
        .canvases
        .list_accessible(ctx.email(), query.elements)
        .await?;
    Ok(Json(canvases))
}

/// POST /canvas
pub async fn create_canvas(
    State(state): State<AppState>,
    ctx: Ctx,
    Payload(req): Payload<CreateCanvasRequest>,
) -> Result<(StatusCode, Json<Canvas>)> {
    info!("POST /canvas - {}", ctx.email());
    let canvas = state.canvases.create(ctx.email(), &req.name).await?;
    Ok((StatusCode::CREATED, Json(canvas)))
}

/// GET /canvas/{id}
pub async fn get_canvas(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
) -> Result<Json<Canvas>> {
    info!("GET /canvas/{} - {}", id, ctx.email());
    let canvas = state.canvases.get_by_id(&id, ctx.email()).await?;
    Ok(Json(canvas))
}

/// PUT /canvas/{id}
pub async fn update_canvas(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
    Payload(req): Payload<UpdateCanvasRequest>,
) -> Result<Json<Canvas>> {
    info!("PUT /canvas/{} - {}", id, ctx.email());
    let canvas = state
        .canvases
        .update(&id, ctx.email(), req.elements)
        .await?;
    Ok(Json(canvas))
}

/// PUT /canvas/{id}/share
pub async fn share_canvas(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
    Payload(req): Payload<ShareCanvasRequest>,
) -> Result<Json<Canvas>> {
    info!("PUT /canvas/{}/share - {} -> {}", id, ctx.email(), req.shared_with_email);
    let canvas = state
        .canvases
        .share(&id, ctx.email(), &req.shared_with_email)
        .await?;
    Ok(Json(canvas))
}

/// DELETE /canvas/{id}
pub async fn delete_canvas(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    info!("DELETE /canvas/{} - {}", id, ctx.email());
    state.canvases.delete(&id, ctx.email()).await?;
    Ok(Json(DeleteResponse { deleted: true }))
}
