//! Changelog formatters

mod markdown;

pub use markdown::MarkdownFormatter;

use cadence_core::config::ReleaseConfig;

use crate::types::ChangeSet;

/// Trait for changelog formatters
pub trait ChangelogFormatter<C = ()>: Send + Sync {
    /// Render a change set, grouped by the configured change types
    fn format(&self, changes: &ChangeSet<C>, config: &ReleaseConfig) -> String;

    /// Get the file extension for this format
    fn extension(&self) -> &'static str;
}
