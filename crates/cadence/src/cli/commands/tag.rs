//! Tag command

use clap::{Args, Subcommand};
use tracing::info;

use cadence_core::config::VersionSchema;
use cadence_strategies::VersionNumber;
use cadence_tags::{parse_tag, print_tag, TagContext, TemplateCache};

use super::inputs;
use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Print or parse tag names
#[derive(Debug, Args)]
pub struct TagCommand {
    #[command(subcommand)]
    pub action: TagAction,
}

/// Tag subcommands
#[derive(Debug, Subcommand)]
pub enum TagAction {
    /// Render the tag for a version
    Print(PrintArgs),
    /// Read the version out of a tag
    Parse(ParseArgs),
}

/// Options shared by both tag subcommands
#[derive(Debug, Args)]
pub struct TagOptions {
    /// Package name
    #[arg(short, long)]
    pub package: String,

    /// Custom tag format, e.g. `{{PACKAGE_NAME}}-v{{MAJOR}}.{{MINOR}}`
    #[arg(long = "tag-format", value_name = "FORMAT")]
    pub tag_format: Option<String>,

    /// Version schema part names, overriding the configuration
    #[arg(long, value_delimiter = ',', value_name = "PARTS")]
    pub schema: Vec<String>,
}

/// Arguments of `tag print`
#[derive(Debug, Args)]
pub struct PrintArgs {
    /// Version to render
    #[arg(id = "VERSION_NUMBER", value_name = "VERSION")]
    pub version: String,

    /// Previous tag of the package
    #[arg(long, value_name = "TAG")]
    pub old_tag: Option<String>,

    #[command(flatten)]
    pub options: TagOptions,
}

/// Arguments of `tag parse`
#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Tag name to parse
    pub tag: String,

    /// Accept tags without the `<package>@` prefix
    #[arg(long)]
    pub allow_bare: bool,

    #[command(flatten)]
    pub options: TagOptions,
}

impl TagOptions {
    fn schema(&self) -> anyhow::Result<VersionSchema> {
        if !self.schema.is_empty() {
            return Ok(VersionSchema::new(self.schema.iter().map(String::as_str)));
        }
        let cwd = std::env::current_dir()?;
        Ok(inputs::release_config(&cwd)?.version_schema)
    }
}

impl TagCommand {
    /// Execute the tag command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let cache = TemplateCache::new();
        match &self.action {
            TagAction::Print(args) => print(args, &cache, cli),
            TagAction::Parse(args) => parse(args, &cache, cli),
        }
    }
}

fn print(args: &PrintArgs, cache: &TemplateCache, cli: &Cli) -> anyhow::Result<()> {
    info!(version = %args.version, package = %args.options.package, "executing tag print command");
    let schema = args.options.schema()?;
    let version = args
        .version
        .parse::<VersionNumber>()?
        .normalize(schema.len());

    let ctx = TagContext::new(&args.options.package, &schema)
        .with_old_tag(args.old_tag.as_deref())
        .with_tag_format(args.options.tag_format.as_deref());
    let tag = print_tag(&version, &ctx, cache)?;

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "version": version.to_string(),
                "tag": tag,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => println!("{}", tag),
    }
    Ok(())
}

fn parse(args: &ParseArgs, cache: &TemplateCache, cli: &Cli) -> anyhow::Result<()> {
    info!(tag = %args.tag, package = %args.options.package, "executing tag parse command");
    let schema = args.options.schema()?;
    let ctx = TagContext::new(&args.options.package, &schema)
        .with_tag_format(args.options.tag_format.as_deref());

    let version = parse_tag(&args.tag, &ctx, args.allow_bare, cache)?;

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "tag": args.tag,
                "version": version.as_ref().map(VersionNumber::to_string),
                "parts": version.as_ref().map(|v| &v.numerical),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => match version {
            Some(version) => println!("{}", version),
            None => {
                if !cli.quiet {
                    output::warning(&format!(
                        "'{}' is not a tag of package '{}'",
                        args.tag, args.options.package
                    ));
                }
            }
        },
    }
    Ok(())
}
