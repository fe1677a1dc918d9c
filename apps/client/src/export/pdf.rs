//! Composes a captured page image into a paginated A4 PDF.

use printpdf::image_crate::{DynamicImage, RgbImage};
use printpdf::{Image, ImageTransform, Mm, PdfDocument};

use super::capture::CapturedImage;
use super::ExportError;

/// "Compose this image into a document file."
pub trait PdfComposer: Send + Sync {
    fn compose(&self, image: &CapturedImage, title: &str) -> Result<Vec<u8>, ExportError>;
}

/// Single-column A4 pages. The image is scaled to the printable width and,
/// when taller than one page, cut into page-high slices.
#[derive(Debug, Clone)]
pub struct A4Composer {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
}

impl Default for A4Composer {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 10.0,
        }
    }
}

impl A4Composer {
    fn content_width_mm(&self) -> f32 {
        self.page_width_mm - 2.0 * self.margin_mm
    }

    fn content_height_mm(&self) -> f32 {
        self.page_height_mm - 2.0 * self.margin_mm
    }

    /// Source-pixel rows that fit on one page at the printable width.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn rows_per_page(&self, width_px: u32) -> u32 {
        let px_per_mm = width_px as f32 / self.content_width_mm();
        ((self.content_height_mm() * px_per_mm).floor() as u32).max(1)
    }

    /// Pixel row ranges `(top, height)` for each page.
    pub fn page_slices(&self, width_px: u32, height_px: u32) -> Vec<(u32, u32)> {
        let per_page = self.rows_per_page(width_px);
        let mut slices = Vec::new();
        let mut top = 0;
        while top < height_px {
            let h = per_page.min(height_px - top);
            slices.push((top, h));
            top += h;
        }
        if slices.is_empty() {
            slices.push((0, height_px.max(1)));
        }
        slices
    }
}

impl PdfComposer for A4Composer {
    #[allow(clippy::cast_precision_loss)]
    fn compose(&self, image: &CapturedImage, title: &str) -> Result<Vec<u8>, ExportError> {
        let (width_px, height_px) = (image.width_px, image.height_px);
        let pixels = RgbImage::from_raw(width_px, height_px, image.to_rgb()).ok_or_else(|| {
            ExportError::Compose(format!(
                "Captured image buffer does not match {width_px}x{height_px}"
            ))
        })?;
        let rgb = DynamicImage::ImageRgb8(pixels);

        // dpi chosen so the image spans exactly the printable width
        let dpi = width_px as f32 / (self.content_width_mm() / 25.4);
        let mm_per_px = self.content_width_mm() / width_px as f32;

        let (doc, first_page, first_layer) = PdfDocument::new(
            title,
            Mm(self.page_width_mm),
            Mm(self.page_height_mm),
            "Layer 1",
        );

        for (i, (top, rows)) in self.page_slices(width_px, height_px).into_iter().enumerate() {
            let (page, layer) = if i == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(
                    Mm(self.page_width_mm),
                    Mm(self.page_height_mm),
                    format!("Layer {}", i + 1),
                )
            };
            let current_layer = doc.get_page(page).get_layer(layer);

            let slice = rgb.crop_imm(0, top, width_px, rows);
            let slice_height_mm = rows as f32 * mm_per_px;

            // PDF y runs bottom-up; pin the slice to the top margin.
            let transform = ImageTransform {
                translate_x: Some(Mm(self.margin_mm)),
                translate_y: Some(Mm(
                    self.page_height_mm - self.margin_mm - slice_height_mm,
                )),
                dpi: Some(dpi),
                ..Default::default()
            };
            Image::from_dynamic_image(&slice).add_to_layer(current_layer, transform);
        }

        doc.save_to_bytes()
            .map_err(|e| ExportError::Compose(format!("PDF save failed: {e}")))
    }
}
