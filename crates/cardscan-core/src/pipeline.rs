//! Layered fallback extraction pipeline.
//!
//! An ordered list of strategies is tried until one yields a name: the
//! recognize-and-re-embed OCR render, then the document's own text layer,
//! then plain OCR over a binarized render. Stage failures are logged and
//! recorded, never propagated; exhausting every stage resolves to `NotFound`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::CardscanConfig;
use crate::error::{CardscanError, Result};
use crate::name::NameMatcher;
use crate::ocr::{ImagePreprocessor, OcrEngine, write_searchable_pdf};
use crate::pdf::CardDocument;

/// Extraction stages, in fallback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Render page 1, recognize, re-embed as a text layer, read it back.
    OcrRender,
    /// The original document's embedded text layer.
    DigitalText,
    /// Plain recognition over a binarized render.
    ScanOcr,
}

impl Stage {
    const ORDER: [Stage; 3] = [Stage::OcrRender, Stage::DigitalText, Stage::ScanOcr];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::OcrRender => "ocr-render",
            Stage::DigitalText => "digital-text",
            Stage::ScanOcr => "scan-ocr",
        };
        f.write_str(label)
    }
}

/// Outcome of a single stage.
enum StageOutcome {
    Found(String),
    NotFound,
    StageError(String),
}

/// Final outcome for one document.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    /// A non-empty name and the stage that produced it.
    Found { name: String, stage: Stage },
    /// Every stage was exhausted without a match.
    NotFound,
}

/// Result of running the pipeline on one document.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    /// Extraction outcome.
    pub outcome: ExtractionOutcome,
    /// Stage errors encountered along the way.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionReport {
    /// The extracted name, if any.
    pub fn name(&self) -> Option<&str> {
        match &self.outcome {
            ExtractionOutcome::Found { name, .. } => Some(name),
            ExtractionOutcome::NotFound => None,
        }
    }
}

/// Name-extraction pipeline over one card PDF at a time.
pub struct ExtractionPipeline {
    config: CardscanConfig,
    engine: Option<OcrEngine>,
    preprocessor: ImagePreprocessor,
    matcher: NameMatcher,
}

impl ExtractionPipeline {
    /// Create a pipeline.
    ///
    /// `engine` is `None` when OCR models are not installed; the OCR stages
    /// then degrade to stage errors and the text-layer stage still runs.
    pub fn new(config: CardscanConfig, engine: Option<OcrEngine>) -> Self {
        Self {
            config,
            engine,
            preprocessor: ImagePreprocessor::new(),
            matcher: NameMatcher::new(),
        }
    }

    /// Run every stage in order against the document at `path`.
    pub fn extract(&self, path: &Path) -> ExtractionReport {
        let start = Instant::now();
        let mut warnings = Vec::new();

        let document = match CardDocument::open(path) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("{}: cannot open document: {}", path.display(), e);
                warnings.push(format!("open: {}", e));
                return ExtractionReport {
                    outcome: ExtractionOutcome::NotFound,
                    warnings,
                    processing_time_ms: start.elapsed().as_millis() as u64,
                };
            }
        };

        for stage in Stage::ORDER {
            match self.run_stage(stage, path, &document) {
                StageOutcome::Found(name) => {
                    info!("{}: found \"{}\" via {}", path.display(), name, stage);
                    return ExtractionReport {
                        outcome: ExtractionOutcome::Found { name, stage },
                        warnings,
                        processing_time_ms: start.elapsed().as_millis() as u64,
                    };
                }
                StageOutcome::NotFound => {
                    debug!("{}: no match from {}", path.display(), stage);
                }
                StageOutcome::StageError(detail) => {
                    warn!("{}: {} failed: {}", path.display(), stage, detail);
                    warnings.push(format!("{}: {}", stage, detail));
                }
            }
        }

        ExtractionReport {
            outcome: ExtractionOutcome::NotFound,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn run_stage(&self, stage: Stage, path: &Path, document: &CardDocument) -> StageOutcome {
        let text = match stage {
            Stage::OcrRender => self.ocr_render_text(path, document),
            Stage::DigitalText => self.digital_text(document),
            Stage::ScanOcr => self.scan_ocr_text(document),
        };

        match text {
            Err(e) => StageOutcome::StageError(e.to_string()),
            Ok(None) => StageOutcome::NotFound,
            Ok(Some(text)) => match self.matcher.first_match(&text) {
                Some(name) => StageOutcome::Found(name),
                None => StageOutcome::NotFound,
            },
        }
    }

    /// Render page 1, recognize, write the searchable overlay into the
    /// scratch directory, and read back its text layer.
    fn ocr_render_text(&self, path: &Path, document: &CardDocument) -> Result<Option<String>> {
        let engine = self.require_engine()?;
        let dpi = self.config.pdf.primary_dpi;

        let image = document.render_first_page(dpi)?;
        let recognized = engine.recognize(&image)?;

        let scratch = ScratchFile::create(&self.config.paths.scratch_dir, path)?;
        write_searchable_pdf(scratch.path(), &image, &recognized, dpi)?;

        let rendered = CardDocument::open(scratch.path())?;
        let text = rendered.text_layer()?;
        Ok(non_empty(text))
    }

    /// The original document's embedded text layer.
    fn digital_text(&self, document: &CardDocument) -> Result<Option<String>> {
        let text = document.text_layer()?;
        if text.trim().len() < self.config.pdf.min_text_length {
            return Ok(None);
        }
        Ok(non_empty(text))
    }

    /// Render at the fallback DPI, binarize, and recognize.
    fn scan_ocr_text(&self, document: &CardDocument) -> Result<Option<String>> {
        let engine = self.require_engine()?;

        let image = document.render_first_page(self.config.pdf.fallback_dpi)?;
        let binary = self.preprocessor.binarize(&image);
        let recognized = engine.recognize(&image::DynamicImage::ImageLuma8(binary))?;
        Ok(non_empty(recognized.text))
    }

    fn require_engine(&self) -> Result<&OcrEngine> {
        self.engine
            .as_ref()
            .ok_or_else(|| CardscanError::Config("OCR engine unavailable".to_string()))
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() { None } else { Some(text) }
}

/// A transient `temp_<source name>` file under the scratch directory,
/// deleted when the guard is dropped.
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    /// Reserve the scratch path for `source`, clearing any stale leftover.
    pub fn create(scratch_dir: &Path, source: &Path) -> std::io::Result<Self> {
        std::fs::create_dir_all(scratch_dir)?;

        let file_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("card.pdf");
        let path = scratch_dir.join(format!("temp_{}", file_name));

        if path.exists() {
            std::fs::remove_file(&path)?;
        }

        Ok(Self { path })
    }

    /// The scratch file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                warn!("failed to remove scratch file {}: {}", self.path.display(), e);
            }
        }
    }
}
