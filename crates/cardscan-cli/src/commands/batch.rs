//! Batch command - process a directory of card PDFs.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use super::{build_pipeline, load_config};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input glob pattern (default: every PDF in the configured source directory)
    input: Option<String>,

    /// Output directory (default: the configured output directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// OCR model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

/// Outcome of one file in the batch.
struct FileResult {
    path: PathBuf,
    name: Option<String>,
    detail: String,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let pattern = args.input.clone().unwrap_or_else(|| {
        config
            .paths
            .source_dir
            .join("*")
            .to_string_lossy()
            .into_owned()
    });

    // Case-insensitive extension match
    let files: Vec<PathBuf> = glob(&pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false)
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No PDF files found for pattern: {}", pattern);
    }

    println!(
        "{} Found {} cards to process",
        style("ℹ").blue(),
        files.len()
    );

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.paths.output_dir.clone());
    fs::create_dir_all(&output_dir)?;

    let pipeline = build_pipeline(config, args.model_dir.clone());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} cards")
            .unwrap()
            .progress_chars("=>-"),
    );

    // Strictly sequential; a per-document failure never aborts the batch
    let mut results = Vec::with_capacity(files.len());
    for path in files {
        let report = pipeline.extract(&path);

        let result = match report.name() {
            Some(name) => {
                let target = output_dir.join(format!("{}.pdf", name));
                match fs::copy(&path, &target) {
                    Ok(_) => {
                        debug!("Copied {} -> {}", path.display(), target.display());
                        pb.println(format!("{} {}", style("✓").green(), name));
                        FileResult {
                            path,
                            name: Some(name.to_string()),
                            detail: String::new(),
                        }
                    }
                    Err(e) => {
                        warn!("failed to copy {}: {}", path.display(), e);
                        pb.println(format!(
                            "{} {} (copy failed)",
                            style("✗").red(),
                            path.display()
                        ));
                        FileResult {
                            path,
                            name: None,
                            detail: format!("copy failed: {}", e),
                        }
                    }
                }
            }
            None => {
                pb.println(format!(
                    "{} {} (no matching name)",
                    style("✗").red(),
                    path.display()
                ));
                let detail = if report.warnings.is_empty() {
                    "no matching name".to_string()
                } else {
                    report.warnings.join("; ")
                };
                FileResult {
                    path,
                    name: None,
                    detail,
                }
            }
        };

        results.push(result);
        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    let renamed: Vec<_> = results.iter().filter(|r| r.name.is_some()).collect();
    let skipped: Vec<_> = results.iter().filter(|r| r.name.is_none()).collect();

    println!();
    println!(
        "{} Processed {} cards in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} renamed, {} skipped",
        style(renamed.len()).green(),
        style(skipped.len()).red()
    );

    for result in &renamed {
        if let Some(name) = &result.name {
            println!("  - {}: {}", result.path.display(), name);
        }
    }

    if !skipped.is_empty() {
        println!();
        println!("{}", style("Skipped files:").red());
        for result in &skipped {
            println!("  - {}: {}", result.path.display(), result.detail);
        }
    }

    Ok(())
}
