//! Error types for the cardscan-core library.

use thiserror::Error;

/// Main error type for the cardscan library.
#[derive(Error, Debug)]
pub enum CardscanError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract the text layer.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// Page 1 could not be decoded into a raster image.
    #[error("failed to access page raster: {0}")]
    PageAccess(String),

    /// Failed to write a composed PDF.
    #[error("failed to write PDF: {0}")]
    Write(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),
}

/// Result type for the cardscan library.
pub type Result<T> = std::result::Result<T, CardscanError>;
