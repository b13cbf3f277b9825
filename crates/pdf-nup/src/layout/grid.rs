//! Slot grid calculation
//!
//! This module turns a sheet size and an items-per-sheet count into the
//! ordered list of slot rectangles items are placed into.

use crate::types::{ItemsPerSheet, NupError, Result};

use super::{GridPosition, Rect, SheetDimensions, Slot};

// =============================================================================
// Grid Shape
// =============================================================================

/// Grid shape (rows, cols) for the given number of items per sheet.
///
/// A coarse step table: roughly square grids that lean toward more columns
/// than rows. Grids may hold more cells than items.
pub fn grid_dimensions(items_per_sheet: usize) -> (usize, usize) {
    match items_per_sheet {
        0 | 1 => (1, 1),
        2 => (1, 2),
        3..=4 => (2, 2),
        5..=6 => (2, 3),
        7..=9 => (3, 3),
        10..=12 => (3, 4),
        13..=16 => (4, 4),
        _ => (4, 5),
    }
}

// =============================================================================
// Slot Planning
// =============================================================================

/// Compute the slots for one sheet.
///
/// Slots are emitted row-major (left-to-right, top-to-bottom) in a top-left
/// coordinate space and truncated once `items_per_sheet` slots exist, so
/// trailing cells of the last row are simply not emitted.
///
/// # Arguments
/// * `sheet` - Sheet dimensions in points
/// * `items_per_sheet` - Number of slots to emit
/// * `margin` - Space between the sheet edge and the grid, on every side
/// * `gap` - Space between neighbouring slots
pub fn plan_slots(
    sheet: SheetDimensions,
    items_per_sheet: ItemsPerSheet,
    margin: f32,
    gap: f32,
) -> Result<Vec<Slot>> {
    let count = items_per_sheet.get();
    let (rows, cols) = grid_dimensions(count);

    let available_width = sheet.width - 2.0 * margin;
    let available_height = sheet.height - 2.0 * margin;
    if available_width <= 0.0 || available_height <= 0.0 {
        return Err(NupError::InvalidArgument(format!(
            "sheet {}x{}pt leaves no room inside a {}pt margin",
            sheet.width, sheet.height, margin
        )));
    }

    let slot_width = (available_width - gap * (cols - 1) as f32) / cols as f32;
    let slot_height = (available_height - gap * (rows - 1) as f32) / rows as f32;
    if slot_width <= 0.0 || slot_height <= 0.0 {
        return Err(NupError::InvalidArgument(format!(
            "a {rows}x{cols} grid with {gap}pt gaps does not fit on a {}x{}pt sheet",
            sheet.width, sheet.height
        )));
    }

    let slots = (0..rows)
        .flat_map(|row| (0..cols).map(move |col| GridPosition::new(row, col)))
        .take(count)
        .map(|position| Slot {
            position,
            rect: Rect::new(
                margin + position.col as f32 * (slot_width + gap),
                margin + position.row as f32 * (slot_height + gap),
                slot_width,
                slot_height,
            ),
        })
        .collect();

    Ok(slots)
}

// =============================================================================
// Tests
// =============================================================================
