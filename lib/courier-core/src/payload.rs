//! Decoded response bodies.

use bytes::Bytes;
use serde_json::Value;

use crate::Result;

/// Outcome of decoding a response body, chosen from its content type.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Payload {
    /// No content, an empty body, or a body that was not read.
    #[default]
    Empty,
    /// Parsed JSON.
    Json(Value),
    /// Plain text.
    Text(String),
    /// Binary blob.
    Binary(Bytes),
}

impl Payload {
    /// Returns `true` for [`Payload::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// JSON value, if this is a JSON payload.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Text, if this is a text payload.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Bytes, if this is a binary payload.
    #[must_use]
    pub const fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Typed view of the payload.
    ///
    /// `Empty` yields `None`; text and binary payloads are parsed as JSON.
    pub fn decode<T: serde::de::DeserializeOwned>(self) -> Result<Option<T>> {
        match self {
            Self::Empty => Ok(None),
            Self::Json(value) => crate::from_json_value(value).map(Some),
            Self::Text(text) => crate::from_json(text.as_bytes()).map(Some),
            Self::Binary(bytes) => crate::from_json(&bytes).map(Some),
        }
    }
}
