//! Page-1 raster recovery.
//!
//! Scanned cards store the page content as a single image XObject. Rendering
//! means locating that image, decoding it, and scaling it to the page's
//! physical size at the requested DPI.

use image::{DynamicImage, GrayImage, RgbImage};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace};

use super::Result;
use crate::error::PdfError;

const POINTS_PER_INCH: f32 = 72.0;

/// Render page 1 of `doc` at `dpi`.
pub(crate) fn render_first_page(doc: &Document, dpi: u32) -> Result<DynamicImage> {
    let pages = doc.get_pages();
    let page_id = *pages.get(&1).ok_or(PdfError::NoPages)?;

    let image = largest_page_image(doc, page_id)?;

    let (page_w, page_h) = media_box(doc, page_id).unwrap_or((612.0, 792.0));
    let target_w = ((page_w / POINTS_PER_INCH) * dpi as f32).round().max(1.0) as u32;
    let target_h = ((page_h / POINTS_PER_INCH) * dpi as f32).round().max(1.0) as u32;

    debug!(
        "Rendering page 1: scan {}x{}, page {:.0}x{:.0}pt -> {}x{} @ {}dpi",
        image.width(),
        image.height(),
        page_w,
        page_h,
        target_w,
        target_h,
        dpi
    );

    if image.width() == target_w && image.height() == target_h {
        return Ok(image);
    }

    Ok(image.resize_exact(target_w, target_h, image::imageops::FilterType::Lanczos3))
}

/// Find the largest decodable image on the page; the page scan for a card.
fn largest_page_image(doc: &Document, page_id: ObjectId) -> Result<DynamicImage> {
    let mut images = page_images(doc, page_id);

    if images.is_empty() {
        // Some writers reference the scan outside the page resources
        debug!("No XObject images on page 1, scanning all objects");
        images = doc
            .objects
            .values()
            .filter_map(|obj| decode_image_object(doc, obj))
            .collect();
    }

    images
        .into_iter()
        .max_by_key(|img| (img.width() as u64) * (img.height() as u64))
        .ok_or_else(|| PdfError::PageAccess("page 1 has no decodable raster content".to_string()))
}

/// Decode the image XObjects referenced by the page resources.
fn page_images(doc: &Document, page_id: ObjectId) -> Vec<DynamicImage> {
    let mut images = Vec::new();

    let Some(resources) = page_resources(doc, page_id) else {
        return images;
    };

    if let Ok(xobjects) = resources.get(b"XObject") {
        if let Ok((_, Object::Dictionary(xobj_dict))) = doc.dereference(xobjects) {
            for (_name, obj_ref) in xobj_dict.iter() {
                if let Ok((_, obj)) = doc.dereference(obj_ref) {
                    if let Some(img) = decode_image_object(doc, obj) {
                        images.push(img);
                    }
                }
            }
        }
    }

    images
}

/// Resources dictionary for a page, walking up the page tree if inherited.
fn page_resources(doc: &Document, node_id: ObjectId) -> Option<Dictionary> {
    let node = doc.get_object(node_id).ok()?;
    let Object::Dictionary(dict) = node else {
        return None;
    };

    if let Ok(resources) = dict.get(b"Resources") {
        if let Ok((_, Object::Dictionary(res_dict))) = doc.dereference(resources) {
            return Some(res_dict.clone());
        }
    }

    if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent") {
        return page_resources(doc, *parent_id);
    }

    None
}

/// MediaBox of the page in points, walking up the page tree if inherited.
fn media_box(doc: &Document, node_id: ObjectId) -> Option<(f32, f32)> {
    let node = doc.get_object(node_id).ok()?;
    let Object::Dictionary(dict) = node else {
        return None;
    };

    if let Ok(mb) = dict.get(b"MediaBox") {
        if let Ok((_, Object::Array(values))) = doc.dereference(mb) {
            if values.len() == 4 {
                let n: Vec<f32> = values.iter().filter_map(as_number).collect();
                if n.len() == 4 {
                    return Some(((n[2] - n[0]).abs(), (n[3] - n[1]).abs()));
                }
            }
        }
    }

    if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent") {
        return media_box(doc, *parent_id);
    }

    None
}

fn as_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

/// Try to decode an object as an image XObject.
fn decode_image_object(doc: &Document, obj: &Object) -> Option<DynamicImage> {
    let Object::Stream(stream) = obj else {
        return None;
    };
    let dict = &stream.dict;

    let subtype = dict.get(b"Subtype").ok()?;
    if subtype.as_name().ok()? != b"Image" {
        return None;
    }

    let width = dict.get(b"Width").ok()?.as_i64().ok()? as u32;
    let height = dict.get(b"Height").ok()?.as_i64().ok()? as u32;
    trace!("Found image object: {}x{}", width, height);

    if let Ok(filter) = dict.get(b"Filter") {
        let filter_name = match filter {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(arr) if !arr.is_empty() => arr.first().and_then(|o| o.as_name().ok()),
            _ => None,
        };

        match filter_name {
            Some(b"DCTDecode") => {
                // JPEG: the raw stream content is the compressed image
                return image::load_from_memory_with_format(
                    &stream.content,
                    image::ImageFormat::Jpeg,
                )
                .ok();
            }
            Some(b"JPXDecode") | Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
                trace!("Unsupported image filter, skipping");
                return None;
            }
            _ => {}
        }
    }

    let data = match stream.decompressed_content() {
        Ok(d) => d,
        Err(_) => stream.content.clone(),
    };

    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(8);
    if bits != 8 {
        trace!("Unsupported bits per component: {}", bits);
        return None;
    }

    let color_space = dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|o| match o {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
            Object::Reference(r) => doc.get_object(*r).ok().and_then(|o| o.as_name().ok()),
            _ => None,
        })
        .unwrap_or(b"DeviceRGB");

    decode_raw_pixels(&data, width, height, color_space)
}

fn decode_raw_pixels(
    data: &[u8],
    width: u32,
    height: u32,
    color_space: &[u8],
) -> Option<DynamicImage> {
    match color_space {
        b"DeviceRGB" | b"RGB" => {
            let expected = (width as usize) * (height as usize) * 3;
            if data.len() < expected {
                trace!("RGB stream too short: {} < {}", data.len(), expected);
                return None;
            }
            RgbImage::from_raw(width, height, data[..expected].to_vec())
                .map(DynamicImage::ImageRgb8)
        }
        b"DeviceGray" | b"G" => {
            let expected = (width as usize) * (height as usize);
            if data.len() < expected {
                trace!("Gray stream too short: {} < {}", data.len(), expected);
                return None;
            }
            GrayImage::from_raw(width, height, data[..expected].to_vec())
                .map(DynamicImage::ImageLuma8)
        }
        other => {
            trace!("Unsupported color space: {:?}", String::from_utf8_lossy(other));
            None
        }
    }
}
