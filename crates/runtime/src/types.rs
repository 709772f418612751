//! Session identity and the record stored per player.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use farm_core::{Avatar, GameSession, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier shared by a player and their session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Player identity and cosmetics. Passive data; no rules read it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub id: SessionId,
    #[serde(flatten)]
    pub avatar: Avatar,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every successful read or mutation of the session.
    pub last_active: DateTime<Utc>,
}

impl PlayerProfile {
    pub fn new(id: SessionId, avatar: Avatar, now: DateTime<Utc>) -> Self {
        Self {
            id,
            avatar,
            created_at: now,
            last_active: now,
        }
    }
}

/// Everything stored for one session: who the player is and their farm.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub player: PlayerProfile,
    pub game: GameSession,
}

impl SessionRecord {
    pub fn id(&self) -> SessionId {
        self.player.id
    }
}

/// Converts a wall-clock instant into the core's millisecond timestamp.
/// Instants before the epoch clamp to zero.
pub fn to_timestamp(instant: DateTime<Utc>) -> Timestamp {
    Timestamp::from_millis(u64::try_from(instant.timestamp_millis()).unwrap_or(0))
}
