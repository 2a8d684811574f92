//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for the cardscan pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardscanConfig {
    /// Batch directory layout.
    pub paths: BatchPaths,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// OCR configuration.
    pub ocr: OcrConfig,
}

/// Directories used by a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchPaths {
    /// Directory scanned for input `.pdf` files.
    pub source_dir: PathBuf,

    /// Scratch directory for transient OCR-rendered PDFs.
    pub scratch_dir: PathBuf,

    /// Directory receiving one `<name>.pdf` copy per matched document.
    pub output_dir: PathBuf,
}

impl Default for BatchPaths {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("cards/source"),
            scratch_dir: PathBuf::from("cards/scratch"),
            output_dir: PathBuf::from("cards/processed"),
        }
    }
}

/// PDF rasterization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// DPI for the primary (recognize-and-re-embed) render.
    pub primary_dpi: u32,

    /// DPI for the fallback plain-OCR render.
    pub fallback_dpi: u32,

    /// Minimum text-layer length to treat a document as carrying digital text.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            primary_dpi: 300,
            fallback_dpi: 200,
            min_text_length: 1,
        }
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
        }
    }
}

impl CardscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

impl OcrConfig {
    /// Full path to the detection model file.
    pub fn detection_path(&self) -> PathBuf {
        self.model_dir.join(&self.detection_model)
    }

    /// Full path to the recognition model file.
    pub fn recognition_path(&self) -> PathBuf {
        self.model_dir.join(&self.recognition_model)
    }

    /// Full path to the character dictionary.
    pub fn dictionary_path(&self) -> PathBuf {
        self.model_dir.join(&self.dictionary)
    }

    /// Whether the model files are present on disk.
    pub fn models_available(&self) -> bool {
        self.detection_path().exists() && self.recognition_path().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_batch_layout() {
        let config = CardscanConfig::default();
        assert_eq!(config.paths.source_dir, PathBuf::from("cards/source"));
        assert_eq!(config.pdf.primary_dpi, 300);
        assert_eq!(config.pdf.fallback_dpi, 200);
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = CardscanConfig::default();
        config.pdf.primary_dpi = 150;
        config.save(&path).unwrap();

        let loaded = CardscanConfig::from_file(&path).unwrap();
        assert_eq!(loaded.pdf.primary_dpi, 150);
        assert_eq!(loaded.ocr.detection_model, "det.onnx");
    }
}
