//! Cache-tag middleware for frameworks with tag-based fetch caching.
//!
//! Reads two extension fields from the request options:
//!
//! - `tags`: array of strings
//! - `revalidate`: seconds before the cached response goes stale, or `false`
//!
//! and writes `next = {"tags": [...tags, key], "revalidate": n}` where `key`
//! identifies the request by resolved URL and `Authorization` value, so two
//! users never share a cache entry.
//!
//! # Example
//!
//! ```
//! use courier::Client;
//! use courier::middleware::CacheTags;
//!
//! let client = Client::new("https://api.test", Some("abc"));
//! client.use_middleware(CacheTags::new());
//! assert_eq!(client.middleware_count(), 1);
//! ```

use serde_json::{Map, Value};

use crate::pipeline::{Middleware, MiddlewareFuture, RequestContext};
use crate::{CacheMode, RequestOptions};

/// Extension key read for the tag list.
pub const TAGS_KEY: &str = "tags";
/// Extension key read for the revalidation delay.
pub const REVALIDATE_KEY: &str = "revalidate";
/// Extension key written with the caching directives.
pub const NEXT_KEY: &str = "next";

/// 53-bit string hash over UTF-16 code units.
///
/// The result always fits in an IEEE-754 double without loss.
#[must_use]
pub fn cyrb53(input: &str, seed: u32) -> u64 {
    let mut h1: u32 = 0xdead_beef ^ seed;
    let mut h2: u32 = 0x41c6_ce57 ^ seed;

    for unit in input.encode_utf16() {
        let unit = u32::from(unit);
        h1 = (h1 ^ unit).wrapping_mul(2_654_435_761);
        h2 = (h2 ^ unit).wrapping_mul(1_597_334_677);
    }

    h1 = (h1 ^ (h1 >> 16)).wrapping_mul(2_246_822_507);
    h1 ^= (h2 ^ (h2 >> 13)).wrapping_mul(3_266_489_909);
    h2 = (h2 ^ (h2 >> 16)).wrapping_mul(2_246_822_507);
    h2 ^= (h1 ^ (h1 >> 13)).wrapping_mul(3_266_489_909);

    (u64::from(h2 & 0x001f_ffff) << 32) + u64::from(h1)
}

/// Cache key for `input`, as a decimal string.
#[must_use]
pub fn cache_key(input: &str, seed: u32) -> String {
    cyrb53(input, seed).to_string()
}

/// Middleware injecting tag-based caching directives.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheTags {
    seed: u32,
}

impl CacheTags {
    /// Middleware hashing with seed `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self { seed: 0 }
    }

    /// Middleware hashing with the given seed.
    #[must_use]
    pub const fn with_seed(seed: u32) -> Self {
        Self { seed }
    }

    /// Configured seed.
    #[must_use]
    pub const fn seed(&self) -> u32 {
        self.seed
    }

    fn apply(self, options: RequestOptions, ctx: &RequestContext) -> RequestOptions {
        let url = ctx.resolve_url(&options);
        let authorization = options.header_value("Authorization").unwrap_or_default();
        let key = cache_key(&format!("{url}{authorization}"), self.seed);

        let extensions = &options.transport_options().extensions;
        let mut tags: Vec<Value> = extensions
            .get(TAGS_KEY)
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter(|tag| tag.is_string()).cloned().collect())
            .unwrap_or_default();
        tags.push(Value::String(key));

        let revalidate = extensions.get(REVALIDATE_KEY).cloned();

        let mut next = Map::new();
        next.insert(TAGS_KEY.to_string(), Value::Array(tags));
        if let Some(revalidate) = revalidate
            .as_ref()
            .filter(|value| value.is_number() || value.as_bool() == Some(false))
        {
            next.insert(REVALIDATE_KEY.to_string(), revalidate.clone());
        }

        let never_cache = revalidate
            .as_ref()
            .and_then(Value::as_f64)
            .is_some_and(|seconds| seconds.abs() < f64::EPSILON);

        let options = options.extension(NEXT_KEY, Value::Object(next));
        if never_cache {
            options.cache(CacheMode::NoStore)
        } else {
            options
        }
    }
}

impl Middleware for CacheTags {
    fn handle<'a>(
        &'a self,
        options: RequestOptions,
        ctx: &'a RequestContext,
    ) -> MiddlewareFuture<'a> {
        let options = self.apply(options, ctx);
        Box::pin(async move { Ok(options) })
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use serde_json::json;

    use super::*;
    use crate::Method;

    fn ctx() -> RequestContext {
        RequestContext::new("https://api.test/", "users", Method::Get)
    }

    #[test]
    fn hash_is_deterministic_and_bounded() {
        let first = cyrb53("https://api.test/users", 0);
        check!(first == cyrb53("https://api.test/users", 0));
        check!(first < (1_u64 << 53));
        check!(cyrb53("", 0) < (1_u64 << 53));
    }

    #[test]
    fn hash_depends_on_input_and_seed() {
        check!(cyrb53("a", 0) != cyrb53("b", 0));
        check!(cyrb53("a", 0) != cyrb53("a", 1));
    }

    #[test]
    fn hash_walks_utf16_units() {
        // one scalar outside the BMP is two UTF-16 units
        check!(cyrb53("\u{1f600}", 0) != cyrb53("\u{f600}", 0));
    }

    #[test]
    fn hash_known_values() {
        check!(cyrb53("", 0) == 3_338_908_027_751_811);
        check!(cyrb53("a", 0) == 7_929_297_801_672_961);
        check!(cyrb53("\u{1f600}", 0) == 4_725_715_722_941_614);
        check!(cyrb53("https://api.test/usersabc", 0) == 6_338_659_570_607_020);
        check!(cyrb53("a", 42) == 1_768_335_378_950_291);
        check!(cache_key("a", 42) == "1768335378950291");
    }

    #[test]
    fn cache_key_is_decimal() {
        let key = cache_key("x", 7);
        check!(key.chars().all(|c| c.is_ascii_digit()));
        check!(key == cyrb53("x", 7).to_string());
    }

    #[tokio::test]
    async fn appends_key_to_tags() {
        let options = RequestOptions::new()
            .param("42")
            .header("Authorization", "abc")
            .extension(TAGS_KEY, json!(["users"]))
            .extension(REVALIDATE_KEY, 60);

        let out = CacheTags::new()
            .handle(options, &ctx())
            .await
            .expect("handle");

        let expected_key = cache_key("https://api.test/users/42abc", 0);
        let_assert!(Some(next) = out.transport_options().extensions.get(NEXT_KEY));
        check!(next == &json!({"tags": ["users", expected_key], "revalidate": 60}));
        check!(out.transport_options().cache.is_none());
    }

    #[tokio::test]
    async fn zero_revalidate_disables_caching() {
        let options = RequestOptions::new().extension(REVALIDATE_KEY, 0);

        let out = CacheTags::with_seed(3)
            .handle(options, &ctx())
            .await
            .expect("handle");

        check!(out.transport_options().cache == Some(CacheMode::NoStore));
        let_assert!(Some(next) = out.transport_options().extensions.get(NEXT_KEY));
        check!(next["revalidate"] == json!(0));
        check!(next["tags"] == json!([cache_key("https://api.test/users", 3)]));
    }

    #[tokio::test]
    async fn revalidate_false_is_kept() {
        let options = RequestOptions::new().extension(REVALIDATE_KEY, false);

        let out = CacheTags::new()
            .handle(options, &ctx())
            .await
            .expect("handle");

        let_assert!(Some(next) = out.transport_options().extensions.get(NEXT_KEY));
        check!(next["revalidate"] == json!(false));
    }

    #[tokio::test]
    async fn key_uses_explicit_url() {
        let options = RequestOptions::new().url("https://cdn.test/a.json");

        let out = CacheTags::new()
            .handle(options, &ctx())
            .await
            .expect("handle");

        let_assert!(Some(next) = out.transport_options().extensions.get(NEXT_KEY));
        check!(next["tags"] == json!([cache_key("https://cdn.test/a.json", 0)]));
        check!(next.get("revalidate").is_none());
    }
}
