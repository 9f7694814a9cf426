//! Cadence Strategies - Version algebra for release computation
//!
//! This crate provides an arbitrary-length version number type, its
//! ordering and increment rules, and the change-set driven next-version
//! calculation.

mod bump;
mod schema;
mod traits;
pub mod version;

pub use bump::{bump_index, get_next_version};
pub use schema::SchemaStrategy;
pub use traits::VersionStrategy;
pub use version::VersionNumber;
