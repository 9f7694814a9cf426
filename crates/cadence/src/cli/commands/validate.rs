//! Validate command

use clap::Args;
use console::style;
use thiserror::Error;
use tracing::info;

use cadence_core::config::{load_config_or_default, ReleaseConfig};
use cadence_tags::{check_tag_format, TemplateCache};

use super::inputs;
use crate::cli::{Cli, OutputFormat};

/// Validation found errors
#[derive(Debug, Error)]
#[error("Validation failed with {0} error(s)")]
pub struct ValidationFailed(pub usize);

/// Validate configuration and package manifests
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Manifest files or glob patterns to validate as well
    #[arg(short, long = "manifest", value_name = "MANIFEST")]
    pub manifests: Vec<String>,

    /// Strict mode - treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

impl ValidateCommand {
    /// Execute the validate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(manifests = self.manifests.len(), strict = self.strict, "executing validate command");
        let cwd = std::env::current_dir()?;

        let mut errors: Vec<String> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();

        let (config, config_path) = match load_config_or_default(&cwd) {
            Ok((config, Some(path))) => (config, Some(path)),
            Ok((config, None)) => {
                warnings.push("No configuration file found, using defaults".to_string());
                (config, None)
            }
            Err(e) => {
                errors.push(format!("Configuration: {}", e));
                (ReleaseConfig::default(), None)
            }
        };

        let mut packages = 0;
        if !self.manifests.is_empty() {
            match inputs::manifests(&self.manifests, &config) {
                Ok(manifests) => {
                    packages = manifests.len();
                    let cache = TemplateCache::new();
                    for manifest in &manifests {
                        if manifest.targets.is_empty() {
                            warnings.push(format!(
                                "Package '{}' declares no publish targets",
                                manifest.package_name
                            ));
                        }
                        if let Some(format) = manifest.tag_format() {
                            let schema = &manifest.settings.version_schema;
                            if let Err(e) = check_tag_format(format, schema, &cache) {
                                errors.push(format!("Package '{}': {}", manifest.package_name, e));
                            }
                        }
                    }
                }
                Err(e) => errors.push(format!("Manifests: {:#}", e)),
            }
        }

        if self.strict {
            errors.append(&mut warnings);
        }

        let passed = errors.is_empty();

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "valid": passed,
                    "config_path": config_path.map(|p| p.to_string_lossy().to_string()),
                    "packages": packages,
                    "errors": errors,
                    "warnings": warnings
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    println!("{}", style("Validation Results").bold());
                    println!();

                    if let Some(path) = &config_path {
                        println!("Config: {}", style(path.display()).cyan());
                        println!();
                    }

                    if !errors.is_empty() {
                        println!("{}", style("Errors:").red().bold());
                        for error in &errors {
                            println!("  {} {}", style("✗").red(), error);
                        }
                        println!();
                    }

                    if !warnings.is_empty() {
                        println!("{}", style("Warnings:").yellow().bold());
                        for warning in &warnings {
                            println!("  {} {}", style("!").yellow(), warning);
                        }
                        println!();
                    }

                    if passed {
                        println!("{}", style("✓ All checks passed").green().bold());
                    }
                }
            }
        }

        if !passed {
            return Err(ValidationFailed(errors.len()).into());
        }

        Ok(())
    }
}
