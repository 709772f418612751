//! Common error infrastructure for farm-core.
//!
//! Domain-specific errors ([`ToolError`](crate::action::ToolError),
//! [`ValidationError`](crate::avatar::ValidationError)) live next to the code
//! that raises them and implement [`GameError`] so the transport layer can
//! classify them without matching on every variant.

use crate::action::Tool;
use crate::state::TilePosition;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the same request may succeed later (after growth, rest)
/// - **Validation**: the request itself is malformed and must change
/// - **Internal**: unexpected state inconsistency; indicates a bug
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Examples: not enough energy, crop not yet mature
    Recoverable,

    /// Examples: tile outside the farm, empty avatar name
    Validation,

    /// Examples: worker channel closed, poisoned store lock
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }
}

/// Contextual information captured where an error is raised.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ErrorContext {
    /// Tool the player attempted, if any.
    pub tool: Option<Tool>,

    /// Tile the request targeted, if any.
    pub position: Option<TilePosition>,

    /// In-game day at the time of the error.
    pub day: u32,

    pub message: Option<&'static str>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(day: u32) -> Self {
        Self {
            tool: None,
            position: None,
            day,
            message: None,
        }
    }

    #[must_use]
    pub const fn with_tool(mut self, tool: Tool) -> Self {
        self.tool = Some(tool);
        self
    }

    #[must_use]
    pub const fn with_position(mut self, position: TilePosition) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait for all farm-core errors.
///
/// - All error enums implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity by recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Stable identifier for logs and metrics.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
