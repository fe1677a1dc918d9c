//! Raster capture of a rendered document.

use std::sync::Arc;

use tracing::debug;

use super::ExportError;
use crate::render::svg::{to_svg, PageLayout};
use crate::render::Document;

/// A captured page image: opaque RGBA8 pixels, row-major.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    pub rgba: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

impl CapturedImage {
    /// Drops the alpha channel. Captures are painted on white, so alpha is always opaque.
    pub fn to_rgb(&self) -> Vec<u8> {
        self.rgba
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect()
    }
}

/// "Render this node to an image."
pub trait NodeCapture: Send + Sync {
    fn capture(&self, doc: &Document) -> Result<CapturedImage, ExportError>;
}

/// Lays the document out as SVG and rasterizes it with resvg.
pub struct SvgRasterizer {
    layout: PageLayout,
    /// Device pixels per layout pixel; 2.0 gives a sharper PDF.
    scale: f32,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl SvgRasterizer {
    pub fn new(layout: PageLayout, scale: f32) -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        debug!("Loaded {} font faces for capture", fontdb.len());
        Self {
            layout,
            scale: scale.max(0.1),
            fontdb: Arc::new(fontdb),
        }
    }
}

impl Default for SvgRasterizer {
    fn default() -> Self {
        Self::new(PageLayout::default(), 2.0)
    }
}

impl NodeCapture for SvgRasterizer {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn capture(&self, doc: &Document) -> Result<CapturedImage, ExportError> {
        let svg = to_svg(doc, &self.layout);

        let mut opt = usvg::Options::default();
        opt.fontdb = Arc::clone(&self.fontdb);
        let tree = usvg::Tree::from_str(&svg, &opt)
            .map_err(|e| ExportError::Capture(format!("SVG parsing failed: {e}")))?;

        let width = (tree.size().width() * self.scale).ceil() as u32;
        let height = (tree.size().height() * self.scale).ceil() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(width.max(1), height.max(1))
            .ok_or_else(|| ExportError::Capture("Failed to create pixmap".to_string()))?;
        pixmap.fill(tiny_skia::Color::WHITE);

        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(self.scale, self.scale),
            &mut pixmap.as_mut(),
        );

        Ok(CapturedImage {
            width_px: pixmap.width(),
            height_px: pixmap.height(),
            rgba: pixmap.take(),
        })
    }
}
