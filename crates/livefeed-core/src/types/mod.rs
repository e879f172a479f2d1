//! Shared type definitions: scope descriptors and filter atoms.

pub mod filter;
pub mod scope;

pub use filter::{DateRange, ReadFilter};
pub use scope::{Role, Scope, ScopeTag};
