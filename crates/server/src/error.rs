//! Mapping from runtime failures onto HTTP status codes and envelopes.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use farm_core::{GameError, ToolError, UnknownTool};
use farm_runtime::RuntimeError;
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::dto::GameStateView;
use crate::envelope::ApiResponse;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid player data")]
    InvalidPlayerData(Vec<String>),

    #[error("Invalid tool")]
    InvalidTool(String),

    #[error("Invalid request body")]
    MalformedBody(String),

    #[error("Player not found")]
    PlayerNotFound,

    /// The farm rules refused a tool use. Carries the unchanged state so the
    /// client can resynchronize.
    #[error("{}", tool_message(.error))]
    ToolRejected {
        error: ToolError,
        game_state: Box<GameStateView>,
    },

    #[error("Internal server error")]
    Internal,
}

/// Client-facing wording for each rejection reason.
fn tool_message(error: &ToolError) -> &'static str {
    match error {
        ToolError::InvalidCoordinates { .. } => "Invalid tile coordinates",
        ToolError::InsufficientEnergy { .. } => "Not enough energy",
        ToolError::ToolNotApplicable { .. } => "Cannot use this tool on this tile",
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidPlayerData(_)
            | ApiError::InvalidTool(_)
            | ApiError::MalformedBody(_)
            | ApiError::ToolRejected { .. } => StatusCode::BAD_REQUEST,
            ApiError::PlayerNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RuntimeError> for ApiError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::SessionNotFound(_) => ApiError::PlayerNotFound,
            RuntimeError::Validation(validation) => ApiError::InvalidPlayerData(validation.reasons),
            RuntimeError::Tool { error, snapshot } => ApiError::ToolRejected {
                error,
                game_state: Box::new(GameStateView::from(&*snapshot)),
            },
            other => {
                error!(error = %other, severity = other.severity().as_str(), "request failed");
                ApiError::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl From<UnknownTool> for ApiError {
    fn from(err: UnknownTool) -> Self {
        ApiError::InvalidTool(err.0)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        let body: ApiResponse<Value> = match self {
            ApiError::InvalidPlayerData(reasons) => {
                ApiResponse::failure(message).with_details(reasons)
            }
            ApiError::InvalidTool(name) => {
                ApiResponse::failure(message).with_details(vec![format!("unknown tool '{name}'")])
            }
            ApiError::MalformedBody(reason) => {
                ApiResponse::failure(message).with_details(vec![reason])
            }
            ApiError::ToolRejected { error, game_state } => {
                debug!(
                    code = error.error_code(),
                    context = ?error.context(),
                    %error,
                    "tool use rejected"
                );
                ApiResponse::failure(message)
                    .with_data(json!({ "gameState": game_state }))
                    .with_details(vec![error.to_string()])
            }
            ApiError::PlayerNotFound | ApiError::Internal => ApiResponse::failure(message),
        };

        (status, Json(body)).into_response()
    }
}
