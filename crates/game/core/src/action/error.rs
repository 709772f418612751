use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::state::TilePosition;

use super::Tool;

/// Reasons a tool use is rejected. Every variant is raised before any tile or
/// resource is touched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ToolError {
    #[error("tile {position} is outside the {width}x{height} farm")]
    InvalidCoordinates {
        position: TilePosition,
        width: u32,
        height: u32,
        context: ErrorContext,
    },

    #[error("{tool} needs {required} energy but only {available} is left")]
    InsufficientEnergy {
        tool: Tool,
        required: u32,
        available: u32,
        context: ErrorContext,
    },

    #[error("{tool} cannot be used on tile {position}")]
    ToolNotApplicable {
        tool: Tool,
        position: TilePosition,
        context: ErrorContext,
    },
}

impl GameError for ToolError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ToolError::InvalidCoordinates { .. } => ErrorSeverity::Validation,
            ToolError::InsufficientEnergy { .. } | ToolError::ToolNotApplicable { .. } => {
                ErrorSeverity::Recoverable
            }
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            ToolError::InvalidCoordinates { context, .. }
            | ToolError::InsufficientEnergy { context, .. }
            | ToolError::ToolNotApplicable { context, .. } => Some(context),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ToolError::InvalidCoordinates { .. } => "INVALID_COORDINATES",
            ToolError::InsufficientEnergy { .. } => "INSUFFICIENT_ENERGY",
            ToolError::ToolNotApplicable { .. } => "TOOL_NOT_APPLICABLE",
        }
    }
}

/// A tool name that does not match any [`Tool`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool `{0}`")]
pub struct UnknownTool(pub String);
