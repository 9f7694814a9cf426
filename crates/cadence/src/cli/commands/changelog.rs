//! Changelog command

use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use cadence_changelog::{ChangeSet, ChangelogFormatter, MarkdownFormatter};

use super::inputs;
use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Render a change set as markdown
#[derive(Debug, Args)]
pub struct ChangelogCommand {
    /// Change set files (JSON or YAML), concatenated in order
    #[arg(short, long = "changes", value_name = "FILE", required = true)]
    pub changes: Vec<PathBuf>,

    /// Version heading
    #[arg(long = "for-version", value_name = "VERSION")]
    pub for_version: Option<String>,

    /// Only include these change types
    #[arg(long = "only", value_name = "TYPE")]
    pub only: Vec<String>,

    /// Leave out entry bodies
    #[arg(long)]
    pub no_bodies: bool,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct GroupReport<'a> {
    title: &'a str,
    entries: Vec<&'a str>,
}

impl ChangelogCommand {
    /// Execute the changelog command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(files = self.changes.len(), version = ?self.for_version, "executing changelog command");
        let cwd = std::env::current_dir()?;
        let config = inputs::release_config(&cwd)?;

        let changes = self.selected(inputs::change_sets(&self.changes)?);
        if changes.is_empty() {
            if !cli.quiet {
                println!("{}", style("No changes to report.").yellow());
            }
            return Ok(());
        }

        match cli.format {
            OutputFormat::Json => {
                let grouped = changes.grouped(&config);
                let groups: Vec<GroupReport<'_>> = grouped
                    .iter()
                    .map(|group| GroupReport {
                        title: group.title(),
                        entries: group.entries.iter().map(|e| e.title.as_str()).collect(),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&groups)?);
            }
            OutputFormat::Text => {
                let mut formatter = MarkdownFormatter::new().with_bodies(!self.no_bodies);
                if let Some(version) = &self.for_version {
                    formatter = formatter.with_version(version);
                }
                let markdown = formatter.format(&changes, &config);

                match &self.output {
                    Some(path) => {
                        std::fs::write(path, &markdown)?;
                        if !cli.quiet {
                            output::success(&format!("Changelog written to {}", path.display()));
                        }
                    }
                    None => print!("{}", markdown),
                }
            }
        }
        Ok(())
    }

    /// Keep only the requested change types, if any were given
    fn selected(&self, changes: ChangeSet) -> ChangeSet {
        if self.only.is_empty() {
            return changes;
        }
        let (selected, _) = changes.extract(|entry| self.only.contains(&entry.change_type));
        selected
    }
}
