//! Recognize-and-re-embed: compose a searchable single-page PDF.
//!
//! The page raster is embedded as a JPEG XObject and each recognized line is
//! written as invisible text (render mode 3) at its detected position, so the
//! result can be read back through the ordinary text-layer path.

use std::io::Cursor;
use std::path::Path;

use image::DynamicImage;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use tracing::debug;

use super::OcrOutput;
use crate::error::PdfError;
use crate::pdf::Result;

const POINTS_PER_INCH: f32 = 72.0;
const MIN_FONT_SIZE: f32 = 4.0;

/// Write `image` plus the recognized text of `ocr` as a single-page PDF.
///
/// `dpi` is the resolution the image was rendered at; it fixes the physical
/// page size and the mapping from pixel to page coordinates.
pub fn write_searchable_pdf(
    path: &Path,
    image: &DynamicImage,
    ocr: &OcrOutput,
    dpi: u32,
) -> Result<()> {
    let scale = POINTS_PER_INCH / dpi as f32;
    let page_w = image.width() as f32 * scale;
    let page_h = image.height() as f32 * scale;

    let mut jpeg = Vec::new();
    DynamicImage::ImageRgb8(image.to_rgb8())
        .write_to(&mut Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)
        .map_err(|e| PdfError::Write(format!("JPEG encode: {}", e)))?;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image.width() as i64,
            "Height" => image.height() as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        jpeg,
    ));

    let mut operations = vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                page_w.into(),
                0.into(),
                0.into(),
                page_h.into(),
                0.into(),
                0.into(),
            ],
        ),
        Operation::new("Do", vec!["Im0".into()]),
        Operation::new("Q", vec![]),
        Operation::new("BT", vec![]),
        Operation::new("Tr", vec![3.into()]),
    ];

    for text_box in &ocr.boxes {
        if text_box.text.trim().is_empty() {
            continue;
        }
        let (min_x, min_y, _, max_y) = text_box.rect();

        let x = min_x * scale;
        let y = page_h - max_y * scale;
        let size = ((max_y - min_y) * scale).max(MIN_FONT_SIZE);

        operations.push(Operation::new("Tf", vec!["F1".into(), size.into()]));
        operations.push(Operation::new(
            "Tm",
            vec![1.into(), 0.into(), 0.into(), 1.into(), x.into(), y.into()],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(text_box.text.as_str())],
        ));
    }
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content
            .encode()
            .map_err(|e| PdfError::Write(format!("content encode: {}", e)))?,
    ));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), page_w.into(), page_h.into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => font_id },
            "XObject" => dictionary! { "Im0" => image_id },
        },
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.save(path)
        .map_err(|e| PdfError::Write(e.to_string()))?;

    debug!(
        "Wrote searchable PDF with {} text lines to {}",
        ocr.boxes.len(),
        path.display()
    );

    Ok(())
}
