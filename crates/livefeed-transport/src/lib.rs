//! REST transport for LiveFeed.
//!
//! Implements [`ListTransport`](livefeed_core::traits::ListTransport)
//! over the portal's item API.

pub mod http;

pub use http::HttpTransport;
