//! Vector embedding of source pages

use super::xobject::create_page_xobject;
use super::{PageRenderer, RenderStrategy, RenderedItem};
use crate::layout::{SheetDimensions, Slot, fit_into_slot};
use crate::output::{EmbeddedPage, OutputDocument, SheetId};
use crate::source::{DocumentSource, LopdfSource, SourceItem};
use crate::types::Result;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// Copies the first page of a source item into the output as reusable vector content.
pub trait VectorEmbedder: Send + Sync {
    fn embed(&self, output: &mut OutputDocument, item: &SourceItem) -> Result<EmbeddedPage>;
}

/// [`VectorEmbedder`] that parses with lopdf and embeds a Form XObject.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfEmbedder {
    source: LopdfSource,
}

impl LopdfEmbedder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VectorEmbedder for LopdfEmbedder {
    fn embed(&self, output: &mut OutputDocument, item: &SourceItem) -> Result<EmbeddedPage> {
        let page = self.source.first_page(item)?;
        let mut cache = HashMap::new();
        let id = create_page_xobject(output.document_mut()?, &page, &mut cache)?;
        debug!(
            "Embedded '{}' as form {:?} ({} objects copied)",
            item.name(),
            id,
            cache.len()
        );
        Ok(EmbeddedPage {
            id,
            bbox: page.page_box,
            rotation: page.rotation,
        })
    }
}

/// Renders items as vector content, aspect-fit and centered in their slot.
#[derive(Clone)]
pub struct VectorRenderer {
    embedder: Arc<dyn VectorEmbedder>,
}

impl VectorRenderer {
    pub fn new(embedder: Arc<dyn VectorEmbedder>) -> Self {
        Self { embedder }
    }
}

impl PageRenderer for VectorRenderer {
    fn strategy(&self) -> RenderStrategy {
        RenderStrategy::Vector
    }

    fn render(
        &self,
        output: &mut OutputDocument,
        sheet: SheetId,
        item: &SourceItem,
        slot: &Slot,
        dimensions: SheetDimensions,
    ) -> Result<RenderedItem> {
        let embedded = self.embedder.embed(output, item)?;
        let placement = fit_into_slot(slot, embedded.width(), embedded.height(), dimensions);
        output.draw_xobject(sheet, &embedded, &placement)?;

        Ok(RenderedItem {
            strategy: RenderStrategy::Vector,
            rect: placement.rect,
        })
    }
}
