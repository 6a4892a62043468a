//! Response normalization.
//!
//! Turns a buffered [`Response`] into a [`Payload`] based on its status and
//! declared content type, or into an [`Error::Http`] for failure statuses.
//!
//! Decision order, first match wins:
//!
//! | Condition | Outcome |
//! |-----------|---------|
//! | body not expected | error on failure status, else `Empty` (body unread) |
//! | non-2xx | `Error::Http` with the server `message` or a generic text |
//! | 204 | `Empty` |
//! | `application/octet-stream`, `application/pdf`, `image/*` | `Binary` |
//! | `application/json` | `Json`, `Empty` when blank, decode errors raised |
//! | `text/*` | `Text` |
//! | anything else | `Json` when it parses, otherwise `Empty` with a warning |

use bytes::Bytes;
use serde_json::Value;
use tracing::warn;

use crate::{Error, Payload, Response, Result};

const BINARY_TYPES: [&str; 3] = ["application/octet-stream", "application/pdf", "image/"];

/// Normalize a response into a payload.
///
/// # Errors
///
/// - [`Error::Http`] for any non-2xx status, whether or not a body is expected
/// - [`Error::JsonDeserialization`] when a body declared as `application/json`
///   does not parse
pub fn normalize(response: Response, expect_response: bool) -> Result<Payload> {
    let status = response.status();

    if !expect_response {
        if response.is_success() {
            return Ok(Payload::Empty);
        }
        return Err(Error::http_status(status));
    }

    if !response.is_success() {
        return Err(http_error(status, response.into_body()));
    }

    if response.is_no_content() {
        return Ok(Payload::Empty);
    }

    let content_type = response
        .content_type()
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if BINARY_TYPES.iter().any(|kind| content_type.contains(kind)) {
        return Ok(Payload::Binary(response.into_body()));
    }

    if content_type.contains("application/json") {
        let text = response.text();
        if text.trim().is_empty() {
            return Ok(Payload::Empty);
        }
        return courier_core::from_json::<Value>(text.as_bytes()).map(Payload::Json);
    }

    if content_type.contains("text/") {
        return Ok(Payload::Text(response.text()));
    }

    Ok(lenient_json(status, &response.text()))
}

/// Body of a response without a recognized content type.
fn lenient_json(status: u16, text: &str) -> Payload {
    if text.trim().is_empty() {
        return Payload::Empty;
    }
    match serde_json::from_str(text) {
        Ok(value) => Payload::Json(value),
        Err(err) => {
            warn!(status, error = %err, "response body without content type is not JSON, ignoring it");
            Payload::Empty
        }
    }
}

/// Build the error for a failure status.
///
/// The message is the body's `message` field when the body is a JSON object
/// carrying one, otherwise `HTTP error, status <code>`. A non-empty body is
/// kept on the error.
#[must_use]
pub fn http_error(status: u16, body: Bytes) -> Error {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Error::http_status(status);
    }

    let message = serde_json::from_slice::<Value>(&body)
        .ok()
        .and_then(|value| match value.get("message") {
            Some(Value::String(message)) => Some(message.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        });

    match message {
        Some(message) => Error::http_with_body(status, message, body),
        None => Error::http_with_body(status, format!("HTTP error, status {status}"), body),
    }
}
