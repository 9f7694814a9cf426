//! Plan command

use clap::Args;
use console::style;
use thiserror::Error;
use tracing::info;

use cadence_core::planner::{plan_release_order, DependencyItem, PlanResult};

use super::inputs;
use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Planning stopped on a dependency cycle
#[derive(Debug, Error)]
#[error("Dependency cycle: {0}")]
pub struct CycleError(pub String);

/// Compute the publish order of all packages
#[derive(Debug, Args)]
pub struct PlanCommand {
    /// Manifest files or glob patterns
    #[arg(required = true, value_name = "MANIFEST")]
    pub manifests: Vec<String>,
}

impl PlanCommand {
    /// Execute the plan command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(patterns = ?self.manifests, "executing plan command");
        let cwd = std::env::current_dir()?;
        let config = inputs::release_config(&cwd)?;
        let manifests = inputs::manifests(&self.manifests, &config)?;

        let items: Vec<DependencyItem> = manifests.iter().map(|m| m.dependency_item()).collect();
        let result = plan_release_order(&items);

        self.output_result(&result, cli)?;

        match result {
            PlanResult::Sorted { .. } => Ok(()),
            PlanResult::Circular { cycle } => Err(CycleError(cycle.to_string()).into()),
        }
    }

    fn output_result(&self, result: &PlanResult, cli: &Cli) -> anyhow::Result<()> {
        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(result)?);
            }
            OutputFormat::Text => match result {
                PlanResult::Sorted { order } if cli.quiet => {
                    for name in order {
                        println!("{}", name);
                    }
                }
                PlanResult::Sorted { order } => {
                    println!("{}", output::header("Publish Order"));
                    println!();
                    for (i, name) in order.iter().enumerate() {
                        println!(
                            "  {:>3}. {}",
                            i + 1,
                            output::package(name)
                        );
                    }
                }
                PlanResult::Circular { cycle } => {
                    if !cli.quiet {
                        println!("{}", style("Cannot order packages").red().bold());
                        println!();
                        println!("  {}", cycle);
                    }
                }
            },
        }
        Ok(())
    }
}
