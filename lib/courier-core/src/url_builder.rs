//! URL composition: base + path + path segments + query.
//!
//! Path segments are appended verbatim. Callers are responsible for passing
//! segments that are already safe to place in a URL path.
//!
//! # Example
//!
//! ```
//! use courier_core::{Query, url_builder};
//!
//! let base = url_builder::join("https://api.test", "/users");
//! let query: Query = [("sort", "x")].into_iter().collect();
//!
//! let url = url_builder::build(&base, &["a", "b"], &query);
//! assert_eq!(url, "https://api.test/users/a/b?sort=x");
//! ```

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::{Query, QueryValue};

/// Characters escaped in query keys and values.
///
/// Brackets stay literal so `tags[]=a` and `filter[active]=true` read as written.
const QUERY_COMPONENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}')
    .add(b'\\')
    .add(b'^');

/// Normalizes a base URL so it ends with exactly one `/`.
#[must_use]
pub fn normalize_base(base: &str) -> String {
    format!("{}/", base.trim_end_matches('/'))
}

/// Joins a relative path onto a base URL with exactly one `/` at the join point.
#[must_use]
pub fn join(base: &str, path: &str) -> String {
    let mut url = normalize_base(base);
    url.push_str(path.strip_prefix('/').unwrap_or(path));
    url
}

/// Appends path segments and the serialized query to `base_path`.
///
/// Each segment is preceded by a `/` unless the URL built so far already ends
/// with one. The `?` is only added when the query produced at least one pair.
#[must_use]
pub fn build<S: AsRef<str>>(base_path: &str, params: &[S], query: &Query) -> String {
    let mut url = base_path.to_string();
    for segment in params {
        if !url.ends_with('/') {
            url.push('/');
        }
        url.push_str(segment.as_ref());
    }

    let query = query_string(query);
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }
    url
}

/// Serializes a query into `key=value` pairs joined by `&`.
///
/// - null values are skipped
/// - lists expand into repeated `key[]=value` pairs
/// - nested mappings expand into `key[nested]=value` pairs, skipping nulls
#[must_use]
pub fn query_string(query: &Query) -> String {
    let mut pairs = Vec::new();

    for (key, value) in query.iter() {
        match value {
            QueryValue::Null => {}
            QueryValue::Scalar(scalar) => {
                if !scalar.is_null() {
                    pairs.push(pair(key, &scalar.render()));
                }
            }
            QueryValue::List(items) => {
                let key = format!("{key}[]");
                pairs.extend(items.iter().map(|item| pair(&key, &item.render())));
            }
            QueryValue::Map(entries) => {
                pairs.extend(
                    entries
                        .iter()
                        .filter(|(_, nested)| !nested.is_null())
                        .map(|(nested_key, nested)| {
                            pair(&format!("{key}[{nested_key}]"), &nested.render())
                        }),
                );
            }
        }
    }

    pairs.join("&")
}

fn pair(key: &str, value: &str) -> String {
    format!(
        "{}={}",
        utf8_percent_encode(key, QUERY_COMPONENT),
        utf8_percent_encode(value, QUERY_COMPONENT)
    )
}
