//! paper-prep - Entry point
//!
//! Runs the processing pipeline over PDF files and directories.

use clap::Parser;
use paper_prep::discover::expand_inputs;
use paper_prep::{Layout, PdfOps, Pipeline, PipelineOptions, ToolConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(version, about = "Prepare PDF papers for an e-ink tablet", long_about = None)]
struct CliArguments {
    /// PDF files or directories containing PDF files
    #[arg(required = true, value_name = "INPUT")]
    inputs: Vec<PathBuf>,

    /// Center the content instead of cropping margins
    #[arg(long, conflicts_with = "no_crop")]
    center: bool,

    /// Leave page margins untouched
    #[arg(long)]
    no_crop: bool,

    /// Insert a blank page after every page
    #[arg(long)]
    blank: bool,

    /// Skip the Ghostscript size reduction
    #[arg(long)]
    no_shrink: bool,

    /// Keep files produced by intermediate steps
    #[arg(long)]
    keep_intermediates: bool,

    /// Path to the pdfcrop executable
    #[arg(long, value_name = "PATH")]
    pdfcrop: Option<PathBuf>,

    /// Path to the Ghostscript executable
    #[arg(long, value_name = "PATH")]
    gs: Option<PathBuf>,

    /// JSON file with tool paths
    #[arg(long, value_name = "JSON_FILE")]
    config: Option<PathBuf>,

    /// Scan directories recursively
    #[arg(short, long)]
    recursive: bool,

    /// Only process files whose name matches this glob (directories only)
    #[arg(long, value_name = "GLOB")]
    pattern: Option<String>,

    /// Print a JSON report per input on stdout
    #[arg(long)]
    json: bool,
}

impl CliArguments {
    /// defaults < JSON file < environment < flags
    fn tool_config(&self) -> paper_prep::Result<ToolConfig> {
        ToolConfig::resolve(
            self.config.as_deref(),
            |key| std::env::var(key).ok(),
            self.pdfcrop.clone(),
            self.gs.clone(),
        )
    }

    fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            layout: Layout::from_switches(self.center, self.no_crop),
            blank: self.blank,
            shrink: !self.no_shrink,
            keep_intermediates: self.keep_intermediates,
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paper_prep=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let arguments = CliArguments::parse();
    tracing::debug!(?arguments, "Parsed arguments");

    let config = arguments.tool_config()?;
    let options = arguments.pipeline_options();
    let files = expand_inputs(
        &arguments.inputs,
        arguments.recursive,
        arguments.pattern.as_deref(),
    )?;
    if files.is_empty() {
        tracing::warn!("No PDF files found");
        return Ok(());
    }

    let pipeline = Pipeline::new(PdfOps::new(config), options);
    let mut failures = 0usize;
    for file in &files {
        match pipeline.run(file) {
            Ok(report) => {
                if arguments.json {
                    println!("{}", report.to_json()?);
                } else {
                    println!("{}", report.output.display());
                }
            }
            Err(e) => {
                tracing::error!(path = %file.display(), error = %e, "Processing failed");
                eprintln!("{}: {}", file.display(), e.client_message());
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} files failed", failures, files.len());
    }
    Ok(())
}
