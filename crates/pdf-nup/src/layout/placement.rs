//! Content placement within slots
//!
//! This module handles calculating where a source page lands inside its slot:
//! - Aspect-preserving fit scale
//! - Centering inside the slot
//! - Raster bitmap sizing with the render-scale cap
//! - Conversion from top-left slot space to PDF bottom-left space

use super::{Rect, SheetDimensions, Slot};

/// Scale that fits a `src` box inside a `target` box, preserving aspect ratio.
///
/// Never exceeds either axis ratio, so the result always fits.
pub fn fit_scale(src_width: f32, src_height: f32, target_width: f32, target_height: f32) -> f32 {
    let scale_w = target_width / src_width;
    let scale_h = target_height / src_height;
    scale_w.min(scale_h)
}

/// Center a `draw_width` x `draw_height` box inside the slot (top-left space).
pub fn center_in_slot(slot: &Slot, draw_width: f32, draw_height: f32) -> Rect {
    Rect::new(
        slot.x() + (slot.width() - draw_width) / 2.0,
        slot.y() + (slot.height() - draw_height) / 2.0,
        draw_width,
        draw_height,
    )
}

/// Where a source page of the given size is drawn on the sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Drawn rectangle in PDF space (bottom-left origin), points
    pub rect: Rect,
    /// Source points to sheet points
    pub scale: f32,
}

/// Fit a page into its slot and convert the result to PDF space.
pub fn fit_into_slot(
    slot: &Slot,
    page_width: f32,
    page_height: f32,
    sheet: SheetDimensions,
) -> Placement {
    let scale = fit_scale(page_width, page_height, slot.width(), slot.height());
    let top_left = center_in_slot(slot, page_width * scale, page_height * scale);

    Placement {
        rect: top_left.flip_y(sheet.height),
        scale,
    }
}

/// Bitmap size and drawn rectangle for a rasterized page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterPlacement {
    /// Bitmap width in pixels
    pub width_px: u32,
    /// Bitmap height in pixels
    pub height_px: u32,
    /// Page points to bitmap pixels, after the cap
    pub render_scale: f32,
    /// Drawn rectangle in PDF space, points
    pub rect: Rect,
}

/// Page-to-bitmap scale for a slot measured in pixels, capped at `max_render_scale`.
pub fn raster_scale(
    page_width: f32,
    page_height: f32,
    slot_width_px: f32,
    slot_height_px: f32,
    max_render_scale: f32,
) -> f32 {
    fit_scale(page_width, page_height, slot_width_px, slot_height_px).min(max_render_scale)
}

/// Size a raster render of a page for its slot.
///
/// The slot is measured in pixels at `pixel_ratio` (DPI / 72), the page is
/// scaled to fit it (capped), and the bitmap is drawn back in sheet points
/// using the same centering as the vector path.
pub fn fit_raster_into_slot(
    slot: &Slot,
    page_width: f32,
    page_height: f32,
    sheet: SheetDimensions,
    pixel_ratio: f32,
    max_render_scale: f32,
) -> RasterPlacement {
    let slot_width_px = slot.width() * pixel_ratio;
    let slot_height_px = slot.height() * pixel_ratio;
    let render_scale = raster_scale(
        page_width,
        page_height,
        slot_width_px,
        slot_height_px,
        max_render_scale,
    );

    let width_px = ((page_width * render_scale).floor() as u32).max(1);
    let height_px = ((page_height * render_scale).floor() as u32).max(1);

    let top_left = center_in_slot(
        slot,
        width_px as f32 / pixel_ratio,
        height_px as f32 / pixel_ratio,
    );

    RasterPlacement {
        width_px,
        height_px,
        render_scale,
        rect: top_left.flip_y(sheet.height),
    }
}
