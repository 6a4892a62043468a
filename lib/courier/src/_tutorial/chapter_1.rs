//! # Chapter 1: Request Options
//!
//! [`RequestOptions`](crate::RequestOptions) is an immutable value. Each
//! builder call returns a new value.
//!
//! ## Path Segments
//!
//! Segments are appended after the path, in order, without encoding:
//!
//! ```ignore
//! // GET https://api.example.com/users/42/posts
//! client.get("users", RequestOptions::new().params(["42", "posts"])).await?;
//! ```
//!
//! ## Query Parameters
//!
//! | Value | Serialized |
//! |-------|------------|
//! | `.query("sort", "name")` | `sort=name` |
//! | `.query("tags", vec!["a", "b"])` | `tags[]=a&tags[]=b` |
//! | `.query("filter", QueryValue::map([("active", true)]))` | `filter[active]=true` |
//! | `.query("page", None::<u32>)` | nothing |
//!
//! ## Headers
//!
//! ```ignore
//! let options = RequestOptions::new()
//!     .header("X-Request-Id", "r-1")
//!     .header("Content-Type", "text/csv");
//! ```
//!
//! Header names are case-insensitive; your headers win over the defaults.
//!
//! ## Bodies
//!
//! ```ignore
//! use courier::Form;
//!
//! // JSON, encoded at dispatch time
//! let options = RequestOptions::new().json(&new_user)?;
//!
//! // Text and bytes are sent as is
//! let options = RequestOptions::new().text("plain");
//!
//! // Multipart forms set their own boundary content type
//! let form = Form::new().text("name", "x").file("avatar", "me.png", png_bytes);
//! let options = RequestOptions::new().multipart(form);
//! ```
//!
//! ## Full URL Override
//!
//! `.url("https://cdn.example.com/file.json")` skips the URL builder.
//!
//! Next: [Chapter 2: Responses](super::chapter_2)
