//! # Transport Bridge Traits
//!
//! Abstraction traits between the gateway core and its external
//! collaborators.
//!
//! ## Overview
//!
//! The gateway core never talks to the network directly. It consumes an
//! authenticated-HTTP capability through the [`HttpClient`](http::HttpClient)
//! trait and hands plain-data results back to whatever transport hosts it.
//! Keeping the trait in its own crate lets the HTTP implementation, the
//! protocol transport, and the tests all bind to the same seam.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP requests against the
//!   storage and identity providers
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type.
//! Implementations should convert their platform-specific errors to
//! `BridgeError` and include enough context to diagnose a failed call.
//!
//! ## Thread Safety
//!
//! Bridge traits require `Send + Sync` bounds so a single client can serve
//! concurrent protocol calls.

pub mod error;
pub mod http;

pub use error::BridgeError;
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
