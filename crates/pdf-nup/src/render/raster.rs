//! Raster rendering of source pages

use super::{PageRenderer, RenderStrategy, RenderedItem};
use crate::layout::{SheetDimensions, Slot, fit_raster_into_slot};
use crate::options::RasterOptions;
use crate::output::{OutputDocument, SheetId};
use crate::source::SourceItem;
use crate::types::{NupError, Result};
use image::RgbImage;
use log::debug;
use std::sync::Arc;

/// Renders the first page of a source item to a bitmap.
pub trait Rasterizer: Send + Sync {
    /// First page size in points
    fn page_size(&self, item: &SourceItem) -> Result<(f32, f32)>;

    /// Render the first page at exactly `width_px` x `height_px`, flattened on white.
    fn render(&self, item: &SourceItem, width_px: u32, height_px: u32) -> Result<RgbImage>;
}

/// Renders items as embedded JPEG images.
#[derive(Clone)]
pub struct RasterRenderer {
    rasterizer: Arc<dyn Rasterizer>,
    options: RasterOptions,
}

impl RasterRenderer {
    pub fn new(rasterizer: Arc<dyn Rasterizer>, options: RasterOptions) -> Self {
        Self {
            rasterizer,
            options,
        }
    }
}

impl PageRenderer for RasterRenderer {
    fn strategy(&self) -> RenderStrategy {
        RenderStrategy::Raster
    }

    fn render(
        &self,
        output: &mut OutputDocument,
        sheet: SheetId,
        item: &SourceItem,
        slot: &Slot,
        dimensions: SheetDimensions,
    ) -> Result<RenderedItem> {
        let (page_width, page_height) = self.rasterizer.page_size(item)?;
        if !(page_width > 0.0 && page_height > 0.0) {
            return Err(NupError::Render(format!(
                "'{}' has an empty page ({}x{}pt)",
                item.name(),
                page_width,
                page_height
            )));
        }

        let placement = fit_raster_into_slot(
            slot,
            page_width,
            page_height,
            dimensions,
            self.options.pixel_ratio(),
            self.options.max_render_scale,
        );
        debug!(
            "Rasterizing '{}' at {}x{}px (scale {:.3})",
            item.name(),
            placement.width_px,
            placement.height_px,
            placement.render_scale
        );

        let bitmap = self
            .rasterizer
            .render(item, placement.width_px, placement.height_px)?;
        output.draw_image(sheet, &bitmap, placement.rect)?;

        Ok(RenderedItem {
            strategy: RenderStrategy::Raster,
            rect: placement.rect,
        })
    }
}
