//! PDF access: document loading, text-layer extraction, page rasterization.

mod document;
mod raster;

pub use document::CardDocument;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;
