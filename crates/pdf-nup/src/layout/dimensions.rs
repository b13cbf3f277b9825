//! Paper size resolution

use crate::types::{LayoutOrientation, PaperSize};

use super::SheetDimensions;

/// Resolve a named paper size and orientation preference into sheet dimensions.
///
/// Horizontal puts the larger paper dimension on the width, Vertical the smaller.
pub fn resolve_dimensions(paper: PaperSize, orientation: LayoutOrientation) -> SheetDimensions {
    let (width, height) = paper.dimensions_with_orientation(orientation);
    SheetDimensions::new(width, height)
}
