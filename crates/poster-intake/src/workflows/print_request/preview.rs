//! Preview rendering: derive the first page's physical size from the PDF
//! page tree and rasterize that page for the on-screen option comparison.
//!
//! Page geometry is recomputed from the stored bytes on every render. Only
//! one submission is in flight per session, so nothing is cached.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::DynamicImage;
use lopdf::{Document, Object, ObjectId};
use tracing::debug;

use super::scaling::{compute_scaling_options, InvalidGeometry, ScalingOptions};

/// Standard PDF page coordinate unit: 1 point is 1/72 inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Physical size of the first page, derived fresh on each preview render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_inches: f64,
    pub height_inches: f64,
}

/// Failures while turning uploaded bytes into a preview.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("upload is not a readable PDF: {detail}")]
    UnreadablePdf { detail: String },
    #[error(transparent)]
    InvalidGeometry(#[from] InvalidGeometry),
    #[error(transparent)]
    Raster(#[from] RasterError),
    #[error("failed to encode preview image: {0}")]
    Encode(#[from] image::ImageError),
}

impl PreviewError {
    fn unreadable(detail: impl Into<String>) -> Self {
        Self::UnreadablePdf {
            detail: detail.into(),
        }
    }
}

/// Rasterisation failures, reported separately so the pdfium adapter can be
/// swapped out behind [`PageRasterizer`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum RasterError {
    #[error("failed to bind the pdfium library: {0}")]
    Binding(String),
    #[error("document failed to open: {0}")]
    OpenFailed(String),
    #[error("first page unavailable: {0}")]
    PageUnavailable(String),
    #[error("rasterisation failed: {0}")]
    RenderFailed(String),
}

/// Renders the first page of a PDF to a bitmap.
///
/// The production implementation wraps pdfium; tests substitute a stub so the
/// state machine can be exercised without the native library.
pub trait PageRasterizer: Send + Sync {
    fn rasterize_first_page(&self, bytes: &[u8]) -> Result<DynamicImage, RasterError>;
}

/// Everything the preview stage shows for one render pass.
#[derive(Debug, Clone)]
pub struct PreviewArtifact {
    pub geometry: PageGeometry,
    pub options: ScalingOptions,
    pub image_png_base64: String,
}

/// Run the full preview pipeline over the stored upload.
pub fn render_preview<P: PageRasterizer + ?Sized>(
    rasterizer: &P,
    bytes: &[u8],
) -> Result<PreviewArtifact, PreviewError> {
    let geometry = read_page_geometry(bytes)?;
    let options = compute_scaling_options(geometry.width_inches, geometry.height_inches)?;
    let image = rasterizer.rasterize_first_page(bytes)?;
    let image_png_base64 = encode_preview_png(&image)?;
    Ok(PreviewArtifact {
        geometry,
        options,
        image_png_base64,
    })
}

/// Parse the upload and derive the first page's size in inches.
pub fn read_page_geometry(bytes: &[u8]) -> Result<PageGeometry, PreviewError> {
    if !bytes.starts_with(b"%PDF") {
        return Err(PreviewError::unreadable("missing %PDF header"));
    }

    let document = Document::load_mem(bytes)
        .map_err(|err| PreviewError::unreadable(format!("parse failed: {err}")))?;

    let first_page_id = document
        .get_pages()
        .into_iter()
        .next()
        .map(|(_, id)| id)
        .ok_or_else(|| PreviewError::unreadable("document has no pages"))?;

    let media_box = page_attribute(&document, first_page_id, b"MediaBox")
        .ok_or_else(|| PreviewError::unreadable("first page has no MediaBox"))?;
    let rect = media_box
        .as_array()
        .ok()
        .filter(|values| values.len() == 4)
        .ok_or_else(|| PreviewError::unreadable("MediaBox is not a 4-number array"))?;

    let mut edges = [0.0f64; 4];
    for (slot, object) in edges.iter_mut().zip(rect) {
        *slot = object_to_f64(&document, object)
            .ok_or_else(|| PreviewError::unreadable("MediaBox contains a non-numeric entry"))?;
    }

    let width_points = (edges[2] - edges[0]).abs();
    let height_points = (edges[3] - edges[1]).abs();
    let geometry = PageGeometry {
        width_inches: width_points / POINTS_PER_INCH,
        height_inches: height_points / POINTS_PER_INCH,
    };

    if geometry.width_inches <= 0.0 || geometry.height_inches <= 0.0 {
        return Err(InvalidGeometry {
            width_inches: geometry.width_inches,
            height_inches: geometry.height_inches,
        }
        .into());
    }

    debug!(
        width_inches = geometry.width_inches,
        height_inches = geometry.height_inches,
        "derived page geometry"
    );
    Ok(geometry)
}

/// Encode a rendered page as base64 PNG for inline display. PNG keeps the
/// poster text crisp at the preview's small size.
pub fn encode_preview_png(image: &DynamicImage) -> Result<String, image::ImageError> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    Ok(STANDARD.encode(&buf))
}

/// Look up a page attribute, walking `/Parent` links for values inherited
/// from the page tree.
fn page_attribute<'a>(document: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut current = page_id;
    loop {
        let dict = document.get_object(current).ok()?.as_dict().ok()?;
        if let Ok(value) = dict.get(key) {
            return match value {
                Object::Reference(id) => document.get_object(*id).ok(),
                other => Some(other),
            };
        }
        match dict.get(b"Parent") {
            Ok(Object::Reference(id)) => current = *id,
            _ => return None,
        }
    }
}

fn object_to_f64(document: &Document, object: &Object) -> Option<f64> {
    match object {
        Object::Integer(value) => Some(*value as f64),
        Object::Real(value) => Some(*value as f64),
        Object::Reference(id) => {
            let resolved = document.get_object(*id).ok()?;
            match resolved {
                Object::Integer(value) => Some(*value as f64),
                Object::Real(value) => Some(*value as f64),
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use lopdf::dictionary;

    fn pdf_with_media_box(rect: [i64; 4]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => rect.iter().map(|edge| (*edge).into()).collect::<Vec<Object>>(),
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("serialize test pdf");
        bytes
    }

    fn pdf_without_pages() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0,
        });
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("serialize test pdf");
        bytes
    }

    #[test]
    fn landscape_letter_reads_as_eleven_by_eight_and_a_half() {
        let bytes = pdf_with_media_box([0, 0, 792, 612]);
        let geometry = read_page_geometry(&bytes).expect("geometry");
        assert!((geometry.width_inches - 11.0).abs() < 1e-9);
        assert!((geometry.height_inches - 8.5).abs() < 1e-9);
    }

    #[test]
    fn media_box_with_offset_origin_still_measures_the_page() {
        let bytes = pdf_with_media_box([10, 20, 802, 632]);
        let geometry = read_page_geometry(&bytes).expect("geometry");
        assert!((geometry.width_inches - 11.0).abs() < 1e-9);
        assert!((geometry.height_inches - 8.5).abs() < 1e-9);
    }

    #[test]
    fn media_box_inherited_from_the_page_tree_is_found() {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("serialize test pdf");

        let geometry = read_page_geometry(&bytes).expect("geometry");
        assert!((geometry.width_inches - 8.5).abs() < 1e-9);
        assert!((geometry.height_inches - 11.0).abs() < 1e-9);
    }

    #[test]
    fn non_pdf_bytes_are_unreadable() {
        let result = read_page_geometry(b"this is not a pdf at all");
        assert!(matches!(result, Err(PreviewError::UnreadablePdf { .. })));
    }

    #[test]
    fn zero_page_document_is_unreadable() {
        let result = read_page_geometry(&pdf_without_pages());
        match result {
            Err(PreviewError::UnreadablePdf { detail }) => {
                assert!(detail.contains("no pages"), "got: {detail}");
            }
            other => panic!("expected UnreadablePdf, got {other:?}"),
        }
    }

    #[test]
    fn degenerate_media_box_is_invalid_geometry() {
        let bytes = pdf_with_media_box([0, 0, 0, 612]);
        let result = read_page_geometry(&bytes);
        assert!(matches!(result, Err(PreviewError::InvalidGeometry(_))));
    }

    #[test]
    fn encoded_preview_round_trips_as_base64_png() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            8,
            8,
            Rgba([134, 38, 51, 255]),
        ));
        let encoded = encode_preview_png(&image).expect("encode");
        let decoded = STANDARD.decode(&encoded).expect("valid base64");
        assert!(decoded.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    struct SolidRasterizer;

    impl PageRasterizer for SolidRasterizer {
        fn rasterize_first_page(&self, _bytes: &[u8]) -> Result<DynamicImage, RasterError> {
            Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                4,
                4,
                Rgba([255, 255, 255, 255]),
            )))
        }
    }

    #[test]
    fn render_preview_combines_geometry_options_and_image() {
        let bytes = pdf_with_media_box([0, 0, 792, 612]);
        let artifact = render_preview(&SolidRasterizer, &bytes).expect("preview");
        assert_eq!(artifact.options.fit_width.label(), "Option A (36x27.8)");
        assert!(!artifact.image_png_base64.is_empty());
    }
}
