//! # livefeed-core
//!
//! Core crate for LiveFeed. Contains trait seams, configuration schemas,
//! scope and filter types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other LiveFeed crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::SyncError;
pub use result::SyncResult;
