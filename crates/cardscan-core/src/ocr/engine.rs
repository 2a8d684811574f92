//! Recognition engine wrapper around `pure-onnx-ocr`.

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use super::{OcrOutput, TextBox, sort_reading_order};
use crate::config::OcrConfig;
use crate::error::OcrError;

/// OCR engine backed by `pure-onnx-ocr` (pure Rust, no external runtime).
pub struct OcrEngine {
    engine: pure_onnx_ocr::engine::OcrEngine,
}

impl OcrEngine {
    /// Create an engine from the model files named by `config`.
    pub fn from_config(config: &OcrConfig) -> Result<Self, OcrError> {
        let det_path = config.detection_path();
        let rec_path = config.recognition_path();
        let dict_path = config.dictionary_path();

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!(
            "Loaded pure-onnx-ocr engine from {}",
            config.model_dir.display()
        );

        Ok(Self { engine })
    }

    /// Recognize text in an image, returning regions in reading order.
    pub fn recognize(&self, image: &DynamicImage) -> Result<OcrOutput, OcrError> {
        let (width, height) = image.dimensions();
        debug!("Recognizing image: {}x{}", width, height);

        let regions = self
            .engine
            .run_from_image(image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        let mut boxes: Vec<TextBox> = regions
            .iter()
            .map(|r| TextBox {
                bbox: polygon_to_bbox(&r.bounding_box),
                text: r.text.replace("[UNK]", " "),
                confidence: r.confidence,
            })
            .collect();

        sort_reading_order(&mut boxes);

        let text = boxes
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        debug!("Recognized {} text regions", boxes.len());

        Ok(OcrOutput {
            boxes,
            text,
            image_size: (width, height),
        })
    }

    /// Convenience: recognized text only.
    pub fn extract_text(&self, image: &DynamicImage) -> Result<String, OcrError> {
        Ok(self.recognize(image)?.text)
    }
}

/// Convert a `Polygon<f64>` to our `[f32; 8]` bbox format.
fn polygon_to_bbox(polygon: &pure_onnx_ocr::Polygon<f64>) -> [f32; 8] {
    let mut bbox = [0.0f32; 8];
    for (i, coord) in polygon.exterior().coords().take(4).enumerate() {
        bbox[i * 2] = coord.x as f32;
        bbox[i * 2 + 1] = coord.y as f32;
    }
    bbox
}
