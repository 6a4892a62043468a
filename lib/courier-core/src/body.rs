//! Request bodies and JSON helpers.

use bytes::Bytes;

use crate::{Form, Result};

/// `Content-Type` sent by default with every request.
pub const APPLICATION_JSON: &str = "application/json";

/// Request body carried through the middleware pipeline.
///
/// Bodies stay unserialized until the pipeline has run, so middleware can
/// inspect, rewrite or replace them.
#[derive(Debug, Clone)]
pub enum Body {
    /// Text, sent as is.
    Text(String),
    /// Raw bytes, sent as is.
    Binary(Bytes),
    /// Multipart form data, sent as is with its boundary content type.
    Multipart(Form),
    /// JSON value, encoded at dispatch time.
    Json(serde_json::Value),
}

/// Wire form of a [`Body`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    /// Body bytes.
    pub bytes: Bytes,
    /// Content type the body must be sent with, when it dictates one.
    pub content_type: Option<String>,
}

impl Body {
    /// JSON body from any serializable value.
    pub fn json<T: serde::Serialize>(value: &T) -> Result<Self> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    /// Returns `true` for bodies that are passed through without encoding.
    #[must_use]
    pub const fn is_passthrough(&self) -> bool {
        !matches!(self, Self::Json(_))
    }

    /// Encodes the body for the wire.
    ///
    /// Text, bytes and multipart forms pass through unmodified; JSON values are
    /// serialized.
    pub fn encode(self) -> Result<EncodedBody> {
        let encoded = match self {
            Self::Text(text) => EncodedBody {
                bytes: Bytes::from(text),
                content_type: None,
            },
            Self::Binary(bytes) => EncodedBody {
                bytes,
                content_type: None,
            },
            Self::Multipart(form) => {
                let (content_type, bytes) = form.into_body();
                EncodedBody {
                    bytes,
                    content_type: Some(content_type),
                }
            }
            Self::Json(value) => EncodedBody {
                bytes: to_json(&value)?,
                content_type: None,
            },
        };
        Ok(encoded)
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Body {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Bytes> for Body {
    fn from(value: Bytes) -> Self {
        Self::Binary(value)
    }
}

impl From<Form> for Body {
    fn from(value: Form) -> Self {
        Self::Multipart(value)
    }
}

impl From<serde_json::Value> for Body {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

/// Serialize a value to JSON bytes.
///
/// # Example
///
/// ```
/// use courier_core::to_json;
///
/// let bytes = to_json(&serde_json::json!({"name": "x"})).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"name":"x"}"#);
/// ```
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Deserialize JSON bytes with path-aware error messages.
///
/// Failures report the path of the offending field (e.g. `user.address.city`).
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}

/// Deserialize an already parsed JSON value with path-aware error messages.
pub fn from_json_value<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    serde_path_to_error::deserialize(value).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn text_and_binary_pass_through() {
        let encoded = Body::from("raw=1").encode().expect("encode");
        assert_eq!(encoded.bytes.as_ref(), b"raw=1");
        assert!(encoded.content_type.is_none());

        let encoded = Body::from(Bytes::from_static(&[0, 159, 146]))
            .encode()
            .expect("encode");
        assert_eq!(encoded.bytes.as_ref(), &[0, 159, 146]);
    }

    #[test]
    fn json_is_encoded_compactly() {
        let encoded = Body::from(json!({"name": "x"})).encode().expect("encode");
        assert_eq!(encoded.bytes.as_ref(), br#"{"name":"x"}"#);
        assert!(encoded.content_type.is_none());
    }

    #[test]
    fn multipart_carries_its_boundary() {
        let form = Form::with_boundary("b0undary").text("field", "value");
        let encoded = Body::from(form).encode().expect("encode");
        assert_eq!(
            encoded.content_type.as_deref(),
            Some("multipart/form-data; boundary=b0undary")
        );
        assert!(String::from_utf8_lossy(&encoded.bytes).contains("--b0undary--"));
    }

    #[test]
    fn passthrough_classification() {
        assert!(Body::from("x").is_passthrough());
        assert!(Body::from(Form::new()).is_passthrough());
        assert!(!Body::from(json!(1)).is_passthrough());
    }

    #[test]
    fn body_json_from_struct() {
        #[derive(serde::Serialize)]
        struct User {
            name: &'static str,
        }

        let body = Body::json(&User { name: "x" }).expect("serialize");
        assert!(matches!(body, Body::Json(value) if value == json!({"name": "x"})));
    }

    #[test]
    fn from_json_reports_path() {
        #[derive(Debug, serde::Deserialize)]
        struct Address {
            #[allow(dead_code)]
            city: String,
        }

        #[derive(Debug, serde::Deserialize)]
        struct User {
            #[allow(dead_code)]
            address: Address,
        }

        let err = from_json::<User>(br#"{"address":{}}"#).expect_err("should fail");
        let msg = err.to_string();
        assert!(msg.contains("address"), "missing path in: {msg}");
        assert!(msg.contains("city"), "missing field in: {msg}");

        let err = from_json_value::<User>(json!({"address": {"city": 3}})).expect_err("fails");
        assert!(err.to_string().contains("address.city"));
    }
}
