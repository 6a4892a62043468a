//! # Tutorial: Talking to an API with courier
//!
//! ## Chapters
//!
//! 1. [Getting Started][chapter_0] - A client, a base URL and a token
//! 2. [Request Options][chapter_1] - Segments, query, headers, bodies
//! 3. [Responses][chapter_2] - Payloads and errors
//! 4. [Middleware][chapter_3] - Rewriting requests before they leave
//!
//! Start with [Chapter 0: Getting Started][chapter_0].

pub mod chapter_0;
pub mod chapter_1;
pub mod chapter_2;
pub mod chapter_3;
