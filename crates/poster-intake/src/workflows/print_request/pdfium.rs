//! pdfium-backed rasterizer. pdfium wraps a blocking C++ library, so callers
//! run this off the async workers (the service uses `spawn_blocking`).

use image::DynamicImage;
use pdfium_render::prelude::*;

use super::preview::{PageRasterizer, RasterError, POINTS_PER_INCH};

/// Resolution for the on-screen preview. At 72 DPI one output pixel covers
/// one PDF point, so the bitmap span equals the page's point span.
const PREVIEW_DPI: f64 = 72.0;

/// Production [`PageRasterizer`] bound to the system pdfium library.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfiumRasterizer;

impl PdfiumRasterizer {
    pub fn new() -> Self {
        Self
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn rasterize_first_page(&self, bytes: &[u8]) -> Result<DynamicImage, RasterError> {
        let bindings = Pdfium::bind_to_system_library()
            .map_err(|err| RasterError::Binding(err.to_string()))?;
        let pdfium = Pdfium::new(bindings);

        let document = pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|err| RasterError::OpenFailed(format!("{err:?}")))?;

        let page = document
            .pages()
            .get(0)
            .map_err(|err| RasterError::PageUnavailable(format!("{err:?}")))?;

        let scale = PREVIEW_DPI / POINTS_PER_INCH;
        let width_px = (f64::from(page.width().value) * scale).round() as i32;
        let height_px = (f64::from(page.height().value) * scale).round() as i32;
        let render_config = PdfRenderConfig::new()
            .set_target_width(width_px.max(1))
            .set_maximum_height(height_px.max(1));

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|err| RasterError::RenderFailed(format!("{err:?}")))?;

        Ok(bitmap.as_image())
    }
}
