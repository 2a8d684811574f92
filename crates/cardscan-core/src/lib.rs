//! Core library for scanned-card name extraction.
//!
//! This crate provides:
//! - PDF access (text-layer extraction, page-1 rasterization)
//! - OCR pipeline (pure-onnx-ocr recognition, Otsu binarization, searchable
//!   overlay composition)
//! - Name matching against the card name pattern
//! - The layered fallback extraction pipeline

pub mod config;
pub mod error;
pub mod name;
pub mod ocr;
pub mod pdf;
pub mod pipeline;

pub use config::{BatchPaths, CardscanConfig, OcrConfig, PdfConfig};
pub use error::{CardscanError, Result};
pub use name::NameMatcher;
pub use ocr::{ImagePreprocessor, OcrEngine, OcrOutput, TextBox};
pub use pdf::CardDocument;
pub use pipeline::{ExtractionOutcome, ExtractionPipeline, ExtractionReport, Stage};
