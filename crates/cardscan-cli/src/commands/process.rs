//! Process command - extract the name from a single card PDF.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use super::{build_pipeline, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input card PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Copy the file into this directory as `<name>.pdf` on success
    #[arg(long)]
    copy_to: Option<PathBuf>,

    /// OCR model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text summary
    Text,
    /// JSON report
    Json,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pipeline = build_pipeline(config, args.model_dir.clone());
    let report = pipeline.extract(&args.input);

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => match report.name() {
            Some(name) => {
                println!("{} {}", style("✓").green(), name);
            }
            None => {
                println!(
                    "{} no name found in {}",
                    style("✗").red(),
                    args.input.display()
                );
            }
        },
    }

    for warning in &report.warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
    }

    if let (Some(name), Some(copy_to)) = (report.name(), &args.copy_to) {
        fs::create_dir_all(copy_to)?;
        let target = copy_to.join(format!("{}.pdf", name));
        fs::copy(&args.input, &target)?;
        println!(
            "{} copied to {}",
            style("✓").green(),
            target.display()
        );
    }

    Ok(())
}
