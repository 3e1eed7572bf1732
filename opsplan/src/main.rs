/// The opsplan executable
///
/// Runs individual planner operations on JSON documents, primarily for
/// testing and debugging plan behavior without a deployment around it.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use opsplan_core::{Block, Value};
use opsplan_diffs::preserve_computed_attrs;

fn main() -> Result<()> {
    let args = Args::parse();
    set_up_logging(args.options.verbose)?;

    match &args.command {
        Commands::Preserve {
            schema,
            prior,
            proposed,
            pretty,
        } => {
            let out = run_preserve(schema, prior, proposed, *pretty)?;
            println!("{}", out);
        }
        Commands::GenerateMan => {
            let cmd = Args::command();
            let man = clap_mangen::Man::new(cmd);
            let mut buffer: Vec<u8> = Default::default();
            man.render(&mut buffer)?;
            println!("{}", String::from_utf8(buffer)?);
        }
        Commands::GenerateMarkdown => {
            let opts = clap_markdown::MarkdownOptions::new().show_footer(false);
            let markdown: String = clap_markdown::help_markdown_custom::<Args>(&opts);
            println!("{}", markdown);
        }
    }

    Ok(())
}

fn run_preserve(schema: &Path, prior: &Path, proposed: &Path, pretty: bool) -> Result<String> {
    let schema: Block = load_json(schema)?;
    let prior: Value = load_json(prior)?;
    let proposed: Value = load_json(proposed)?;

    let merged = preserve_computed_attrs(&prior, &proposed, &schema)
        .context("failed to preserve computed attributes")?;

    let rendered = if pretty {
        serde_json::to_string_pretty(&merged)?
    } else {
        serde_json::to_string(&merged)?
    };
    Ok(rendered)
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn set_up_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        tracing::Level::TRACE
    } else {
        tracing::Level::INFO
    };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("failed to set up tracing: {}", e))?;
    Ok(())
}

/// Run planner operations on JSON documents
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    options: Options,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug)]
struct Options {
    /// Log at trace level, showing individual merge decisions
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge previously recorded computed values into a proposed value
    ///
    /// Reads a schema block, the prior value recorded for a resource, and
    /// the proposed value from configuration evaluation, and prints the
    /// merged value on stdout.
    Preserve {
        /// Path to the schema block, as JSON
        #[arg(long)]
        schema: PathBuf,

        /// Path to the prior (fully concrete) value, as JSON
        #[arg(long)]
        prior: PathBuf,

        /// Path to the proposed value, as JSON; may contain "unknown" nodes
        #[arg(long)]
        proposed: PathBuf,

        /// Pretty-print the merged value
        #[arg(long)]
        pretty: bool,
    },
    /// Generate a manpage
    GenerateMan,
    /// Generate markdown documentation
    GenerateMarkdown,
}
