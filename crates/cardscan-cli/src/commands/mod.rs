//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;

use std::path::{Path, PathBuf};

use tracing::warn;

use cardscan_core::{CardscanConfig, ExtractionPipeline, OcrEngine};

/// Load the configuration, falling back to defaults.
pub(crate) fn load_config(config_path: Option<&str>) -> anyhow::Result<CardscanConfig> {
    match config_path {
        Some(path) => Ok(CardscanConfig::from_file(Path::new(path))?),
        None => Ok(CardscanConfig::default()),
    }
}

/// Build a pipeline, tolerating absent OCR models.
///
/// Without models the OCR stages degrade to logged stage errors and the
/// text-layer stage still runs.
pub(crate) fn build_pipeline(
    mut config: CardscanConfig,
    model_dir: Option<PathBuf>,
) -> ExtractionPipeline {
    if let Some(dir) = model_dir {
        config.ocr.model_dir = dir;
    }

    let engine = if config.ocr.models_available() {
        match OcrEngine::from_config(&config.ocr) {
            Ok(engine) => Some(engine),
            Err(e) => {
                warn!("failed to load OCR models: {}", e);
                None
            }
        }
    } else {
        warn!(
            "OCR models not found at {}, OCR stages will be skipped",
            config.ocr.model_dir.display()
        );
        None
    };

    ExtractionPipeline::new(config, engine)
}
