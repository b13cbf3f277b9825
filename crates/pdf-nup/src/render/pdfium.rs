//! Pdfium-backed rasterizer

use super::Rasterizer;
use crate::source::SourceItem;
use crate::types::{NupError, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage, RgbaImage};
use pdfium_render::prelude::*;
use std::path::PathBuf;

/// Directory searched for a bundled pdfium before the system library
const VENDOR_LIBRARY_DIR: &str = "vendor/pdfium/lib";

/// Bind pdfium, trying the vendored library first, then falling back to system
pub fn init_pdfium() -> std::result::Result<Pdfium, PdfiumError> {
    let vendor_path = std::env::current_dir()
        .ok()
        .map(|dir| dir.join(VENDOR_LIBRARY_DIR))
        .filter(|p: &PathBuf| p.exists());

    if let Some(vendor_path) = vendor_path {
        if let Ok(binding) =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&vendor_path))
        {
            return Ok(Pdfium::new(binding));
        }
    }

    Pdfium::bind_to_system_library().map(Pdfium::new)
}

/// [`Rasterizer`] that renders through pdfium.
///
/// The library is bound per call, so the rasterizer can be shared across threads.
#[derive(Debug, Clone, Copy)]
pub struct PdfiumRasterizer {
    _private: (),
}

impl PdfiumRasterizer {
    /// Fails when no pdfium library can be bound.
    pub fn new() -> Result<Self> {
        init_pdfium().map_err(|e| NupError::Render(format!("pdfium is not available: {e}")))?;
        Ok(Self { _private: () })
    }
}

fn render_error(item: &SourceItem, e: PdfiumError) -> NupError {
    NupError::Render(format!("pdfium failed on '{}': {}", item.name(), e))
}

impl Rasterizer for PdfiumRasterizer {
    fn page_size(&self, item: &SourceItem) -> Result<(f32, f32)> {
        let pdfium = init_pdfium().map_err(|e| render_error(item, e))?;
        let document = pdfium
            .load_pdf_from_byte_slice(item.bytes(), None)
            .map_err(|e| render_error(item, e))?;
        let page = document.pages().get(0).map_err(|e| render_error(item, e))?;
        Ok((page.width().value, page.height().value))
    }

    fn render(&self, item: &SourceItem, width_px: u32, height_px: u32) -> Result<RgbImage> {
        let pdfium = init_pdfium().map_err(|e| render_error(item, e))?;
        let document = pdfium
            .load_pdf_from_byte_slice(item.bytes(), None)
            .map_err(|e| render_error(item, e))?;
        let page = document.pages().get(0).map_err(|e| render_error(item, e))?;

        let config = PdfRenderConfig::new()
            .set_target_width(width_px as i32)
            .set_maximum_height(height_px as i32);
        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| render_error(item, e))?;

        let (w, h) = (bitmap.width() as u32, bitmap.height() as u32);
        let rgba = RgbaImage::from_raw(w, h, bitmap.as_rgba_bytes().to_vec()).ok_or_else(|| {
            NupError::Render(format!("pdfium returned a malformed {w}x{h} bitmap"))
        })?;
        let rgb = DynamicImage::ImageRgba8(rgba).into_rgb8();

        if rgb.dimensions() == (width_px, height_px) {
            Ok(rgb)
        } else {
            Ok(imageops::resize(&rgb, width_px, height_px, FilterType::Triangle))
        }
    }
}
