//! Page rendering strategies
//!
//! This module handles drawing one source item into one slot:
//! - Vector embedding of the first page as a Form XObject
//! - Rasterizing the first page to a bitmap
//! - Falling back from vector to raster per item

mod fallback;
#[cfg(feature = "pdfium")]
mod pdfium;
mod raster;
mod vector;
mod xobject;

pub use fallback::FallbackRenderer;
#[cfg(feature = "pdfium")]
pub use pdfium::{PdfiumRasterizer, init_pdfium};
pub use raster::{RasterRenderer, Rasterizer};
pub use vector::{LopdfEmbedder, VectorEmbedder, VectorRenderer};
pub use xobject::{copy_object_deep, create_page_xobject};

use crate::layout::{Rect, SheetDimensions, Slot};
use crate::output::{OutputDocument, SheetId};
use crate::source::SourceItem;
use crate::types::Result;
use std::fmt;

/// How an item ended up on the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderStrategy {
    /// Embedded as vector content
    Vector,
    /// Rasterized and embedded as an image
    Raster,
}

impl fmt::Display for RenderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderStrategy::Vector => f.write_str("vector"),
            RenderStrategy::Raster => f.write_str("raster"),
        }
    }
}

/// Result of drawing one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedItem {
    pub strategy: RenderStrategy,
    /// Drawn rectangle in PDF space
    pub rect: Rect,
}

/// Draws the first page of a source item into a slot.
///
/// A failed render must not leave anything drawn on the sheet.
pub trait PageRenderer: Send + Sync {
    /// Strategy tried first
    fn strategy(&self) -> RenderStrategy;

    fn render(
        &self,
        output: &mut OutputDocument,
        sheet: SheetId,
        item: &SourceItem,
        slot: &Slot,
        dimensions: SheetDimensions,
    ) -> Result<RenderedItem>;
}
