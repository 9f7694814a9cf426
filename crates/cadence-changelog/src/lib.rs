//! Cadence Changelog - Change sets for release computation
//!
//! This crate provides the ordered change-log entries accumulated for a
//! package's next release and renders them as markdown.

pub mod formatter;
pub mod types;

pub use formatter::{ChangelogFormatter, MarkdownFormatter};
pub use types::{ChangeGroup, ChangeSet, ChangeSetEntry};
