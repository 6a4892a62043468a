//! # Chapter 0: Getting Started
//!
//! ## Dependencies
//!
//! ```toml
//! [dependencies]
//! courier = "0.1"
//! tokio = { version = "1", features = ["macros", "rt-multi-thread"] }
//! ```
//!
//! ## A Client
//!
//! A [`Client`](crate::Client) holds a base URL and an optional token. The
//! token is sent verbatim as the `Authorization` header, so include the
//! scheme yourself:
//!
//! ```ignore
//! use courier::{Client, RequestOptions};
//!
//! #[tokio::main]
//! async fn main() -> courier::Result<()> {
//!     let client = Client::new("https://api.example.com", Some("Bearer my-token"));
//!
//!     let users = client.get("users", RequestOptions::new()).await?;
//!     println!("{users:?}");
//!     Ok(())
//! }
//! ```
//!
//! Every request also carries `Content-Type: application/json` unless you
//! set another one.
//!
//! ## Changing State
//!
//! Base URL and token can change while the client is shared; requests read
//! them when they start:
//!
//! ```ignore
//! client.set_token("Bearer refreshed");
//! client.set_base_url("https://staging.example.com");
//! client.clear_token();
//! ```
//!
//! ## Configuration
//!
//! ```ignore
//! use courier::{Client, ClientConfig};
//! use courier::middleware::LogLevel;
//!
//! let client = Client::with_config(
//!     ClientConfig::builder()
//!         .base_url("https://api.example.com")
//!         .logging(LogLevel::Debug)
//!         .build(),
//! );
//! ```
//!
//! Next: [Chapter 1: Request Options](super::chapter_1)
