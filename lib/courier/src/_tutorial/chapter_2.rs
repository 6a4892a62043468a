//! # Chapter 2: Responses
//!
//! Every verb returns a [`Payload`](crate::Payload), chosen from the response
//! content type:
//!
//! | Response | Payload |
//! |----------|---------|
//! | 204, or body not expected | `Empty` |
//! | `image/*`, `application/pdf`, `application/octet-stream` | `Binary` |
//! | `application/json` | `Json` (`Empty` when blank) |
//! | `text/*` | `Text` |
//! | no content type | `Json` when the body parses, else `Empty` |
//!
//! ## Typed Results
//!
//! ```ignore
//! #[derive(serde::Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! let user: Option<User> = client
//!     .fetch(Method::Get, "users", RequestOptions::new().param("42"))
//!     .await?;
//! ```
//!
//! ## Fire and Forget
//!
//! `.expect_response(false)` skips reading the body. A failure status is
//! still an error.
//!
//! ## Errors
//!
//! A non-2xx status becomes [`Error::Http`](crate::Error::Http). Its message
//! is the `message` field of a JSON error body, when there is one:
//!
//! ```ignore
//! match client.get("users/404", RequestOptions::new()).await {
//!     Err(err) if err.is_not_found() => println!("gone: {err}"),
//!     Err(err) => return Err(err),
//!     Ok(payload) => println!("{payload:?}"),
//! }
//! ```
//!
//! Next: [Chapter 3: Middleware](super::chapter_3)
