//! Markdown changelog formatter

use cadence_core::config::ReleaseConfig;
use tracing::{debug, instrument};

use super::ChangelogFormatter;
use crate::types::ChangeSet;

/// Markdown changelog formatter
#[derive(Debug, Clone)]
pub struct MarkdownFormatter {
    /// Version heading placed above the sections
    pub version: Option<String>,
    /// Include entry bodies under their titles
    pub include_bodies: bool,
}

impl MarkdownFormatter {
    /// Create a new markdown formatter
    pub fn new() -> Self {
        Self {
            version: None,
            include_bodies: true,
        }
    }

    /// Add a `## <version>` heading
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set whether entry bodies are rendered
    pub fn with_bodies(mut self, include: bool) -> Self {
        self.include_bodies = include;
        self
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ChangelogFormatter<C> for MarkdownFormatter {
    #[instrument(skip_all, fields(entries = changes.len()))]
    fn format(&self, changes: &ChangeSet<C>, config: &ReleaseConfig) -> String {
        let mut output = String::new();

        if let Some(version) = &self.version {
            output.push_str(&format!("## {}\n\n", version));
        }

        for group in changes.grouped(config) {
            output.push_str(&format!("### {}\n\n", group.title()));

            for entry in &group.entries {
                output.push_str(&format!("- {}\n", entry.title.trim()));

                if self.include_bodies {
                    for line in entry.body.trim_end().lines() {
                        if line.trim().is_empty() {
                            output.push('\n');
                        } else {
                            output.push_str(&format!("  {}\n", line));
                        }
                    }
                }
            }

            output.push('\n');
        }

        let output = format!("{}\n", output.trim_end());
        debug!(output_len = output.len(), "markdown changelog formatted");
        output
    }

    fn extension(&self) -> &'static str {
        "md"
    }
}

impl<C> ChangeSet<C> {
    /// Render as markdown with the default formatter
    pub fn to_markdown(&self, config: &ReleaseConfig) -> String {
        MarkdownFormatter::new().format(self, config)
    }
}
