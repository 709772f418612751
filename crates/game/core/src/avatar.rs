//! Avatar cosmetics and the validation boundary for player creation.
//!
//! Cosmetics carry no gameplay meaning. They are checked once, here, so the
//! runtime only ever receives a fully validated [`Avatar`].

use crate::error::{ErrorSeverity, GameError};

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum BodyType {
    Slim,
    Average,
    Sturdy,
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum HairStyle {
    Short,
    Long,
    Curly,
    Bald,
}

/// Validated cosmetic attributes of a player character.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Avatar {
    /// Trimmed, never empty.
    pub name: String,
    pub body_type: BodyType,
    pub hair_style: HairStyle,
    pub hair_color: String,
    pub skin_tone: String,
}

/// Unchecked avatar fields as they arrive from a client. Every field is
/// optional so that missing and malformed values are reported together.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct AvatarInput {
    pub name: Option<String>,
    pub body_type: Option<String>,
    pub hair_style: Option<String>,
    pub hair_color: Option<String>,
    pub skin_tone: Option<String>,
}

/// Itemized reasons an input was rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[error("invalid player data: {}", .reasons.join("; "))]
pub struct ValidationError {
    pub reasons: Vec<String>,
}

impl GameError for ValidationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        "VALIDATION_FAILED"
    }
}

impl AvatarInput {
    /// Checks every field and returns either a complete [`Avatar`] or all the
    /// problems found.
    pub fn validate(self) -> Result<Avatar, ValidationError> {
        let mut reasons = Vec::new();

        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned);
        if name.is_none() {
            reasons.push("Name is required and must be a non-empty string".to_owned());
        }

        let body_type = self.body_type.as_deref().and_then(|s| s.parse::<BodyType>().ok());
        if body_type.is_none() {
            reasons.push("Valid body type is required".to_owned());
        }

        let hair_style = self.hair_style.as_deref().and_then(|s| s.parse::<HairStyle>().ok());
        if hair_style.is_none() {
            reasons.push("Valid hair style is required".to_owned());
        }

        let hair_color = self.hair_color.filter(|color| !color.is_empty());
        if hair_color.is_none() {
            reasons.push("Valid hair color is required".to_owned());
        }

        let skin_tone = self.skin_tone.filter(|tone| !tone.is_empty());
        if skin_tone.is_none() {
            reasons.push("Valid skin tone is required".to_owned());
        }

        match (name, body_type, hair_style, hair_color, skin_tone) {
            (Some(name), Some(body_type), Some(hair_style), Some(hair_color), Some(skin_tone)) => {
                Ok(Avatar {
                    name,
                    body_type,
                    hair_style,
                    hair_color,
                    skin_tone,
                })
            }
            _ => Err(ValidationError { reasons }),
        }
    }
}
