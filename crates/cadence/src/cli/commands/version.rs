//! Version command

use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use cadence_core::config::ReleaseConfig;
use cadence_strategies::{SchemaStrategy, VersionNumber};
use cadence_tags::{latest_version, print_tag, TagContext, TemplateCache};

use super::inputs;
use crate::cli::output::{self, Section};
use crate::cli::{Cli, OutputFormat};

/// Compute the next version and tag of a package
#[derive(Debug, Args)]
pub struct VersionCommand {
    /// Package name
    #[arg(short, long)]
    pub package: String,

    /// Change set files (JSON or YAML) for the package
    #[arg(short, long = "changes", value_name = "FILE")]
    pub changes: Vec<PathBuf>,

    /// Known tag names
    #[arg(short, long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// File with known tags (JSON or YAML list)
    #[arg(long, value_name = "FILE")]
    pub tags_file: Option<PathBuf>,

    /// Manifest files or glob patterns
    #[arg(short, long = "manifest", value_name = "MANIFEST")]
    pub manifests: Vec<String>,

    /// Accept tags without the `<package>@` prefix
    #[arg(long)]
    pub allow_bare: bool,
}

/// Result of a version computation
#[derive(Debug, Serialize)]
struct VersionReport {
    package: String,
    current: Option<String>,
    current_tag: Option<String>,
    next: Option<String>,
    tag: Option<String>,
    bump: Option<String>,
    changes: usize,
}

impl VersionCommand {
    /// Execute the version command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            package = %self.package,
            changes = self.changes.len(),
            tags = self.tags.len(),
            "executing version command"
        );
        let cwd = std::env::current_dir()?;
        let defaults = inputs::release_config(&cwd)?;

        let (config, tag_format) = self.package_settings(&defaults)?;
        let changes = inputs::change_sets(&self.changes)?;
        let tags = inputs::known_tags(&self.tags, self.tags_file.as_deref())?;

        let cache = TemplateCache::new();
        let ctx = TagContext::new(&self.package, &config.version_schema)
            .with_tag_format(tag_format.as_deref());

        let latest = latest_version(&tags, &ctx, self.allow_bare, &cache)?;
        let (current, current_tag) = match &latest {
            Some((version, tag)) => (Some(version), Some(tag.name.as_str())),
            None => (None, None),
        };

        let strategy = SchemaStrategy::new(config.clone());
        let bump = strategy
            .bump_index(&changes)
            .and_then(|i| config.version_schema.get(i))
            .map(str::to_string);
        let next = strategy.next_version(current, &changes)?;

        let ctx = ctx.with_old_tag(current_tag);
        let tag = next
            .as_ref()
            .map(|version| print_tag(version, &ctx, &cache))
            .transpose()?;

        let report = VersionReport {
            package: self.package.clone(),
            current: current.map(VersionNumber::to_string),
            current_tag: current_tag.map(str::to_string),
            next: next.as_ref().map(VersionNumber::to_string),
            tag,
            bump,
            changes: changes.len(),
        };
        self.output_result(&report, cli)
    }

    /// Effective configuration and tag format of the package
    fn package_settings(
        &self,
        defaults: &ReleaseConfig,
    ) -> anyhow::Result<(ReleaseConfig, Option<String>)> {
        if self.manifests.is_empty() {
            return Ok((defaults.clone(), None));
        }

        let manifests = inputs::manifests(&self.manifests, defaults)?;
        let manifest = manifests
            .iter()
            .find(|m| m.package_name == self.package)
            .ok_or_else(|| anyhow::anyhow!("No manifest declares package '{}'", self.package))?;

        Ok((
            manifest.release_config(),
            manifest.tag_format().map(str::to_string),
        ))
    }

    fn output_result(&self, report: &VersionReport, cli: &Cli) -> anyhow::Result<()> {
        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(report)?);
            }
            OutputFormat::Text if cli.quiet => {
                if let Some(next) = &report.next {
                    println!("{}", next);
                }
            }
            OutputFormat::Text => {
                let mut section = Section::new("Version Calculation")
                    .row("Package", output::package(&report.package))
                    .row("Current version", report.current.as_deref().unwrap_or("none"));
                if cli.verbose {
                    section = section
                        .row_opt("Current tag", report.current_tag.as_deref())
                        .row("Changes analyzed", report.changes);
                }

                match (&report.next, &report.tag) {
                    (Some(next), Some(tag)) => {
                        section
                            .row("Next version", output::version(next))
                            .row(
                                "Bumped part",
                                style(report.bump.as_deref().unwrap_or("base")).yellow(),
                            )
                            .row("Tag", output::tag(tag))
                            .print();
                    }
                    _ => {
                        section.print();
                        println!();
                        output::info("No release due");
                    }
                }
            }
        }
        Ok(())
    }
}
