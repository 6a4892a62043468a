//! Query parameter values.
//!
//! A [`Query`] is an insertion-ordered mapping from key to [`QueryValue`].
//! The URL builder expands it into `key=value`, `key[]=value` and
//! `key[nested]=value` pairs.

use serde_json::Value;

/// A single query value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// `null`, rendered as `null` inside lists.
    Null,
    /// Boolean.
    Bool(bool),
    /// Number.
    Number(serde_json::Number),
    /// Text, rendered verbatim.
    Text(String),
    /// Arbitrary JSON: objects are JSON-stringified, arrays comma-joined.
    Json(Value),
}

impl Scalar {
    /// Returns `true` for [`Scalar::Null`] and `Json(null)`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null | Self::Json(Value::Null))
    }

    /// Renders the value the way it appears in a query string (before encoding).
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(value) => value.to_string(),
            Self::Number(value) => render_number(value),
            Self::Text(value) => value.clone(),
            Self::Json(value) => render_json(value),
        }
    }
}

/// Whole floats render without a fractional part: `2.0` becomes `2`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::float_cmp
)]
fn render_number(number: &serde_json::Number) -> String {
    let whole = number
        .as_f64()
        .filter(|value| number.is_f64() && value.fract() == 0.0)
        .filter(|value| *value >= i64::MIN as f64 && *value < i64::MAX as f64);
    match whole {
        Some(value) => (value as i64).to_string(),
        None => number.to_string(),
    }
}

fn render_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Number(number) => render_number(number),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                // default string conversion renders null/undefined array holes as empty
                Value::Null => String::new(),
                other => render_json(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        // objects are JSON-stringified; bools and numbers have the same text either way
        other => other.to_string(),
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for Scalar {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! scalar_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Self::Number(serde_json::Number::from(value))
                }
            }
        )*
    };
}

scalar_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        // NaN and infinities have no JSON number form
        serde_json::Number::from_f64(value)
            .map_or_else(|| Self::Text(value.to_string()), Self::Number)
    }
}

impl From<Value> for Scalar {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(value) => Self::Bool(value),
            Value::Number(value) => Self::Number(value),
            Value::String(value) => Self::Text(value),
            other => Self::Json(other),
        }
    }
}

/// Value stored under one query key.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// Skipped entirely.
    Null,
    /// Single `key=value` pair.
    Scalar(Scalar),
    /// Repeated `key[]=value` pairs, one per element.
    List(Vec<Scalar>),
    /// `key[nested]=value` pairs, skipping null entries.
    Map(Vec<(String, Scalar)>),
}

impl QueryValue {
    /// Builds a nested flat mapping value.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Scalar>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Returns `true` for values that produce no pair.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<Scalar> for QueryValue {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Null | Scalar::Json(Value::Null) => Self::Null,
            Scalar::Json(Value::Array(items)) => {
                Self::List(items.into_iter().map(Scalar::from).collect())
            }
            Scalar::Json(Value::Object(entries)) => Self::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Scalar::from(value)))
                    .collect(),
            ),
            scalar => Self::Scalar(scalar),
        }
    }
}

macro_rules! query_value_via_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    Self::from(Scalar::from(value))
                }
            }
        )*
    };
}

query_value_via_scalar!(
    &str, String, &String, bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f64, Value
);

impl<T: Into<Scalar>> From<Vec<T>> for QueryValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Scalar>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, |value| Self::from(Into::<Scalar>::into(value)))
    }
}

/// Insertion-ordered query mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    entries: Vec<(String, QueryValue)>,
}

impl Query {
    /// Creates an empty query.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets `key`, replacing an existing value in its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Returns `true` if no key is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Self::new();
        for (key, value) in iter {
            query.insert(key, value);
        }
        query
    }
}
