//! Layout calculation modules for sheet composition
//!
//! This module handles all the geometric calculations:
//! - Sheet dimensions (paper size + orientation preference)
//! - Slot grid (rows, columns and slot rectangles)
//! - Content placement (aspect-preserving fit, centering, coordinate flips)

mod dimensions;
mod grid;
mod placement;
mod types;

pub use dimensions::*;
pub use grid::*;
pub use placement::*;
pub use types::*;
