//! Route handlers.
//!
//! Each handler parses its input into typed values, calls the runtime and
//! wraps the result in the envelope. Status mapping lives in
//! [`crate::error`].

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{SecondsFormat, Utc};
use farm_core::{Tool, ToolUse};
use farm_runtime::SessionId;
use serde_json::{Value, json};
use tracing::info;

use crate::AppState;
use crate::dto::{
    DeletedPayload, GameStatePayload, PickTilePayload, PickTileRequest, PlayerPayload,
    TilePositionView, ToolUsePayload, UpdateGameStateRequest, UseToolRequest, avatar_input,
};
use crate::envelope::ApiResponse;
use crate::error::ApiError;

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Ids that are not UUIDs cannot name a session.
fn session_id(raw: &str) -> Result<SessionId, ApiError> {
    raw.parse().map_err(|_| ApiError::PlayerNotFound)
}

/// Parses a tool name. An unknown session is reported ahead of a bad name.
async fn parse_tool(state: &AppState, id: SessionId, name: &str) -> Result<Tool, ApiError> {
    let err = match Tool::parse(name) {
        Ok(tool) => return Ok(tool),
        Err(err) => err,
    };
    if state.runtime.session_exists(id).await {
        Err(err.into())
    } else {
        Err(ApiError::PlayerNotFound)
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

pub async fn create_player(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<PlayerPayload>>), ApiError> {
    let Json(body) = body?;
    let avatar = avatar_input(&body)
        .validate()
        .map_err(|err| ApiError::InvalidPlayerData(err.reasons))?;

    let record = state.runtime.create_session(avatar).await?;
    info!(player = %record.id(), "player created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(PlayerPayload::from(&record))),
    ))
}

pub async fn get_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<PlayerPayload> {
    let record = state.runtime.get_session(session_id(&id)?).await?;
    Ok(Json(ApiResponse::ok(PlayerPayload::from(&record))))
}

pub async fn delete_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<DeletedPayload> {
    state.runtime.delete_session(session_id(&id)?).await?;
    Ok(Json(ApiResponse::ok(DeletedPayload { deleted: true })))
}

pub async fn use_tool(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<UseToolRequest>, JsonRejection>,
) -> ApiResult<ToolUsePayload> {
    let id = session_id(&id)?;
    let Json(request) = body?;
    let tool = parse_tool(&state, id, &request.tool).await?;
    let (x, y) = request.target();

    let report = state.runtime.use_tool(id, ToolUse::new(tool, x, y)).await?;

    Ok(Json(ApiResponse::ok(ToolUsePayload {
        success: report.result.applied,
        energy_cost: report.result.energy_cost,
        harvest_value: report.result.harvest_value,
        game_state: (&report.snapshot).into(),
    })))
}

pub async fn update_game_state(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<UpdateGameStateRequest>, JsonRejection>,
) -> ApiResult<GameStatePayload> {
    let id = session_id(&id)?;
    let Json(request) = body?;
    let patch = request.game_state;

    // Validate everything before touching the session.
    let tool = match patch.game.and_then(|game| game.current_tool) {
        Some(name) => Some(parse_tool(&state, id, &name).await?),
        None => None,
    };

    let record = state.runtime.patch_session(id, patch.camera, tool).await?;

    Ok(Json(ApiResponse::ok(GameStatePayload::from(&record))))
}

pub async fn update_crops(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<GameStatePayload> {
    let record = state.runtime.advance_crops(session_id(&id)?).await?;
    Ok(Json(ApiResponse::ok(GameStatePayload::from(&record))))
}

pub async fn rest(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<GameStatePayload> {
    let record = state.runtime.rest(session_id(&id)?).await?;
    Ok(Json(ApiResponse::ok(GameStatePayload::from(&record))))
}

pub async fn pick_tile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<PickTileRequest>, JsonRejection>,
) -> ApiResult<PickTilePayload> {
    let id = session_id(&id)?;
    let Json(request) = body?;

    let tile = state
        .runtime
        .pick_tile(id, request.screen(), request.origin())
        .await?;

    Ok(Json(ApiResponse::ok(PickTilePayload {
        tile: tile.map(|position| TilePositionView {
            x: position.x,
            y: position.y,
        }),
    })))
}
