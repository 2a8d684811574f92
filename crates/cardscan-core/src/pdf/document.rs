//! Single-card PDF document access using lopdf and pdf-extract.

use std::path::Path;

use image::DynamicImage;
use lopdf::Document;
use tracing::debug;

use super::{Result, raster};
use crate::error::PdfError;

/// A scanned-card PDF. Only page 1 is ever consulted.
pub struct CardDocument {
    document: Document,
    raw_data: Vec<u8>,
}

impl CardDocument {
    /// Open a card PDF from a file path.
    pub fn open(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| PdfError::Parse(e.to_string()))?;
        Self::load(&data)
    }

    /// Load a card PDF from bytes.
    pub fn load(data: &[u8]) -> Result<Self> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty-password encryption
        let raw_data = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes
            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        if doc.get_pages().is_empty() {
            return Err(PdfError::NoPages);
        }

        Ok(Self {
            document: doc,
            raw_data,
        })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    /// The embedded text layer, verbatim.
    ///
    /// An empty string is the normal outcome for purely scanned pages; only
    /// structural read errors are reported as `Err`.
    pub fn text_layer(&self) -> Result<String> {
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    /// Render page 1 to a bitmap at the given DPI.
    ///
    /// The page scan is recovered from its image XObject and scaled to the
    /// page's physical size at `dpi`.
    pub fn render_first_page(&self, dpi: u32) -> Result<DynamicImage> {
        raster::render_first_page(&self.document, dpi)
    }
}
