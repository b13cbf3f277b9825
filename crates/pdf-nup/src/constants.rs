//! Shared constants for sheet composition
//!
//! This module centralizes the paper table, layout spacing and render
//! limits used throughout the pipeline.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per inch
pub const POINTS_PER_INCH: f32 = 72.0;

/// Pixels per point at the given DPI
#[inline]
pub fn pixel_ratio(dpi: f32) -> f32 {
    dpi / POINTS_PER_INCH
}

// =============================================================================
// Paper Sizes (portrait, points)
// =============================================================================

pub const A4_SIZE_PT: (f32, f32) = (595.28, 841.89);
pub const LETTER_SIZE_PT: (f32, f32) = (612.0, 792.0);
pub const LEGAL_SIZE_PT: (f32, f32) = (612.0, 1008.0);
pub const A3_SIZE_PT: (f32, f32) = (841.89, 1190.55);

// =============================================================================
// Slot Grid
// =============================================================================

/// Space between the sheet edge and the slot grid (points)
pub const DEFAULT_MARGIN_PT: f32 = 20.0;

/// Space between neighbouring slots (points)
pub const DEFAULT_GAP_PT: f32 = 10.0;

pub const MIN_ITEMS_PER_SHEET: u32 = 1;
pub const MAX_ITEMS_PER_SHEET: u32 = 20;

/// Items per sheet when the caller made no selection
pub const DEFAULT_ITEMS_PER_SHEET: u32 = 2;

/// Items per sheet when a custom value is out of range
pub const CUSTOM_ITEMS_PER_SHEET_FALLBACK: u32 = 8;

/// A merge needs at least this many sources; previews need one.
pub const MIN_MERGE_ITEMS: usize = 2;

// =============================================================================
// Rasterization
// =============================================================================

/// Resolution for raster fallback renders
pub const DEFAULT_TARGET_DPI: f32 = 150.0;

/// Upper bound on the page-to-bitmap scale. This is the only guard against
/// pathological page sizes, so it must stay finite.
pub const DEFAULT_MAX_RENDER_SCALE: f32 = 4.0;

/// Resolution of PNG sheet previews
pub const DEFAULT_PREVIEW_DPI: f32 = 96.0;

/// JPEG quality for embedded raster fallbacks
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

// =============================================================================
// Fallback Page Dimensions
// =============================================================================

/// Page size assumed when a source page carries no usable box (US Letter)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = LETTER_SIZE_PT;

/// Parent chain depth limit when resolving inherited page attributes
pub const MAX_PAGE_TREE_DEPTH: usize = 32;
