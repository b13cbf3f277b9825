//! Vector-first rendering with a per-item raster fallback

use super::{PageRenderer, RasterRenderer, RenderStrategy, RenderedItem, VectorRenderer};
use crate::layout::{SheetDimensions, Slot};
use crate::output::{OutputDocument, SheetId};
use crate::source::SourceItem;
use crate::types::{NupError, Result};
use log::warn;

/// Tries vector embedding first and rasterizes the items it cannot embed.
#[derive(Clone)]
pub struct FallbackRenderer {
    primary: VectorRenderer,
    fallback: RasterRenderer,
}

impl FallbackRenderer {
    pub fn new(primary: VectorRenderer, fallback: RasterRenderer) -> Self {
        Self { primary, fallback }
    }
}

impl PageRenderer for FallbackRenderer {
    fn strategy(&self) -> RenderStrategy {
        self.primary.strategy()
    }

    fn render(
        &self,
        output: &mut OutputDocument,
        sheet: SheetId,
        item: &SourceItem,
        slot: &Slot,
        dimensions: SheetDimensions,
    ) -> Result<RenderedItem> {
        match self.primary.render(output, sheet, item, slot, dimensions) {
            Ok(rendered) => Ok(rendered),
            // A sealed document fails the same way on both paths
            Err(e @ NupError::OutputFinalization(_)) => Err(e),
            Err(e) => {
                warn!(
                    "Vector embedding failed for '{}', rasterizing instead: {}",
                    item.name(),
                    e
                );
                self.fallback.render(output, sheet, item, slot, dimensions)
            }
        }
    }
}
